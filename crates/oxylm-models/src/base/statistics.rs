//! Statistical structures for model results

use serde::{Deserialize, Serialize};

/// Model-level fit statistics
///
/// Fields that do not apply to a given estimator are `None`; the iterative
/// fields are only set by iterative solvers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ModelStatistics {
    /// R-squared
    pub r_squared: Option<f64>,
    /// Adjusted R-squared
    pub adj_r_squared: Option<f64>,
    /// Residual standard error
    pub residual_std_error: Option<f64>,
    /// Mean absolute error of the residuals
    pub mean_absolute_error: Option<f64>,
    /// F-statistic
    pub f_statistic: Option<f64>,
    /// F-statistic p-value
    pub f_p_value: Option<f64>,
    /// Residual degrees of freedom
    pub df_residual: Option<usize>,
    /// Model degrees of freedom
    pub df_model: Option<usize>,
    /// Number of iterations (iterative solvers only)
    pub iterations: Option<usize>,
    /// Convergence status (iterative solvers only)
    pub converged: Option<bool>,
}

/// Residual distribution summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ResidualStatistics {
    /// Minimum residual
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum residual
    pub max: f64,
    /// Mean residual
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
}
