//! Fitted linear regression result

use ndarray::{Array1, Array2};

use crate::base::{Coefficient, ModelStatistics};

/// Matrix type alias for 2D arrays
pub type Matrix = Array2<f64>;

/// Vector type alias for 1D arrays
pub type Vector = Array1<f64>;

/// Fitted linear regression result
///
/// Inference vectors (standard errors, t-statistics, p-values, intervals)
/// are present for least squares fits and absent for least absolute
/// deviations, where the closed-form normal theory does not apply.
#[derive(Debug, Clone)]
pub struct LinearRegressionResult {
    /// Coefficients, one per retained design column
    pub coefficients: Vector,
    /// Standard errors
    pub standard_errors: Option<Vector>,
    /// t-statistics
    pub t_statistics: Option<Vector>,
    /// p-values
    pub p_values: Option<Vector>,
    /// Coefficient confidence intervals (lower)
    pub ci_lower: Option<Vector>,
    /// Coefficient confidence intervals (upper)
    pub ci_upper: Option<Vector>,
    /// Fitted values on the training rows
    pub fitted_values: Vector,
    /// Residuals on the training rows
    pub residuals: Vector,
    /// Design matrix used for the fit (retained columns only)
    pub x: Matrix,
    /// Response vector
    pub y: Vector,
    /// Names of the retained design columns
    pub variable_names: Vec<String>,
    /// Rows excluded for missing values
    pub n_dropped_rows: usize,
    /// Design columns excluded for rank deficiency
    pub dropped_columns: Vec<String>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Has intercept
    pub has_intercept: bool,
}

impl LinearRegressionResult {
    /// Build the coefficient table
    pub fn to_coefficients(&self) -> Vec<Coefficient> {
        (0..self.coefficients.len())
            .map(|i| {
                let name = self
                    .variable_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("x{}", i));

                let mut coef = Coefficient::new(name, self.coefficients[i]);

                if let Some(se) = &self.standard_errors {
                    coef = coef.with_std_error(se[i]);
                }
                if let Some(t) = &self.t_statistics {
                    coef = coef.with_t_stat(t[i]);
                }
                if let Some(p) = &self.p_values {
                    coef = coef.with_p_value(p[i]);
                }
                if let (Some(lo), Some(hi)) = (&self.ci_lower, &self.ci_upper) {
                    coef = coef.with_ci(lo[i], hi[i]);
                }
                if i == 0 && self.has_intercept {
                    coef = coef.as_intercept();
                }

                coef
            })
            .collect()
    }
}
