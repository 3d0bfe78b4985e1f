//! Model-related error types

use thiserror::Error;

use oxylm_core::data::DataError;
use oxylm_core::formula::FormulaError;

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Formula parsing or evaluation error
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Missing values rejected by the configured policy
    #[error("{n_missing} rows contain missing values in the model variables")]
    MissingData {
        /// Number of affected rows
        n_missing: usize,
    },

    /// Design matrix is not full rank
    #[error("Design matrix is rank deficient; aliased columns: {columns:?}")]
    RankDeficient {
        /// Names of the linearly dependent columns
        columns: Vec<String>,
    },

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Insufficient data for model fitting
    #[error("Not enough data: {n_samples} samples for {n_predictors} predictors")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of predictors
        n_predictors: usize,
    },

    /// Formula has no response variable
    #[error("Formula has no response variable")]
    MissingResponse,

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },

    /// Model not fitted yet
    #[error("Model not fitted yet")]
    NotFitted,

    /// Custom error
    #[error("{message}")]
    Custom {
        /// Custom error message
        message: String,
    },
}
