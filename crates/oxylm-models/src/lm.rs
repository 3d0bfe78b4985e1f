//! Linear regression models
//!
//! Closed-form ordinary least squares plus least absolute deviations as an
//! alternative loss, both driven by R-style formulas from the core crate.
//! Missing-data handling and rank-deficiency handling are configurable
//! through [`LinearConfig`].

pub mod ols;
pub mod result;

#[cfg(test)]
mod tests;

// Re-exports
pub use ols::LinearRegression;
pub use result::LinearRegressionResult;

// Common types
use crate::base::Result;
use ndarray::Array1;
use oxylm_core::data::DataFrame;
use serde::{Deserialize, Serialize};

/// Linear model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearConfig {
    /// How to treat rows with missing values in the model variables
    pub missing: MissingPolicy,
    /// How to treat linearly dependent design columns
    pub rank: RankPolicy,
    /// Loss function to minimize
    pub loss: Loss,
    /// Confidence level for coefficient intervals
    pub confidence_level: f64,
    /// Iteration cap for iterative solvers
    pub max_iter: usize,
    /// Convergence tolerance for iterative solvers
    pub tol: f64,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::Warn,
            rank: RankPolicy::Error,
            loss: Loss::SquaredError,
            confidence_level: 0.95,
            max_iter: 100,
            tol: 1e-8,
        }
    }
}

/// Policy for rows with missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Drop affected rows without comment
    Silent,
    /// Drop affected rows and log a warning
    Warn,
    /// Refuse to fit when any model variable has a missing value
    Error,
}

/// Policy for rank-deficient design matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankPolicy {
    /// Drop aliased columns (later columns lose) and log a warning
    Drop,
    /// Refuse to fit and report the aliased columns
    Error,
}

/// Loss function for the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loss {
    /// Ordinary least squares
    SquaredError,
    /// Least absolute deviations, solved iteratively
    AbsoluteError,
}

/// Linear model trait
pub trait LinearModel {
    /// Get coefficients
    fn coefficients(&self) -> Option<&Array1<f64>>;

    /// Get standard errors
    fn standard_errors(&self) -> Option<&Array1<f64>>;

    /// Get predictions for new data
    fn predict(&self, data: &DataFrame) -> Result<Array1<f64>>;

    /// Get fitted values
    fn fitted_values(&self) -> Option<&Array1<f64>>;

    /// Get residuals
    fn residuals(&self) -> Option<&Array1<f64>>;
}

/// Convenience function for OLS regression
pub fn lm(formula: &str, data: &DataFrame) -> Result<LinearRegression> {
    LinearRegression::new(formula)?.data(data).fit()
}
