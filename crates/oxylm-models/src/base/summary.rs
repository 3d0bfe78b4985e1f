//! Model summary structures

use super::coefficient::Coefficient;
use super::statistics::{ModelStatistics, ResidualStatistics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comprehensive model summary structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model type
    pub model_type: ModelType,
    /// Model formula
    pub formula: String,
    /// Number of observations used in the fit
    pub n_obs: usize,
    /// Rows excluded for missing values
    pub n_dropped_rows: usize,
    /// Design columns excluded for rank deficiency
    pub dropped_columns: Vec<String>,
    /// Number of predictors (including intercept)
    pub n_predictors: usize,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
    /// Residual statistics
    pub residual_statistics: ResidualStatistics,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "Model Type: {}", self.model_type)?;
        writeln!(f, "Formula: {}", self.formula)?;
        writeln!(f, "Observations: {}", self.n_obs)?;
        if self.n_dropped_rows > 0 {
            writeln!(f, "Rows dropped (missing values): {}", self.n_dropped_rows)?;
        }
        if !self.dropped_columns.is_empty() {
            writeln!(f, "Columns dropped (aliased): {:?}", self.dropped_columns)?;
        }
        writeln!(f, "Predictors: {}", self.n_predictors)?;
        writeln!(f)?;

        // Coefficients
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<20} {:>12} {:>12} {:>12} {:>12}",
            "Term", "Estimate", "Std Error", "t-value", "p-value"
        )?;
        writeln!(
            f,
            "{:-<20} {:-<12} {:-<12} {:-<12} {:-<12}",
            "", "", "", "", ""
        )?;

        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<20} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                coeff.name,
                coeff.estimate,
                coeff.std_error.unwrap_or(f64::NAN),
                coeff.t_stat.unwrap_or(f64::NAN),
                coeff.p_value.unwrap_or(f64::NAN)
            )?;
        }
        writeln!(f)?;

        // Model statistics
        writeln!(f, "Model Statistics:")?;
        if let Some(r2) = self.model_statistics.r_squared {
            writeln!(f, "  R-squared: {:.4}", r2)?;
        }
        if let Some(adj_r2) = self.model_statistics.adj_r_squared {
            writeln!(f, "  Adjusted R-squared: {:.4}", adj_r2)?;
        }
        if let Some(f_stat) = self.model_statistics.f_statistic {
            writeln!(f, "  F-statistic: {:.4}", f_stat)?;
        }
        if let Some(resid_se) = self.model_statistics.residual_std_error {
            writeln!(f, "  Residual Std. Error: {:.4}", resid_se)?;
        }
        if let Some(mae) = self.model_statistics.mean_absolute_error {
            writeln!(f, "  Mean Absolute Error: {:.4}", mae)?;
        }
        if let Some(df_resid) = self.model_statistics.df_residual {
            writeln!(f, "  Residual DF: {}", df_resid)?;
        }
        if let Some(df_model) = self.model_statistics.df_model {
            writeln!(f, "  Model DF: {}", df_model)?;
        }
        if let Some(iterations) = self.model_statistics.iterations {
            writeln!(f, "  Iterations: {}", iterations)?;
        }
        if let Some(converged) = self.model_statistics.converged {
            writeln!(f, "  Converged: {}", converged)?;
        }

        Ok(())
    }
}

/// Model type enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Ordinary least squares linear regression
    LinearRegression,
    /// Least absolute deviations regression
    LeastAbsoluteDeviations,
    /// Other model type
    Other(String),
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::LinearRegression => write!(f, "Linear Regression"),
            ModelType::LeastAbsoluteDeviations => write!(f, "Least Absolute Deviations"),
            ModelType::Other(s) => write!(f, "{}", s),
        }
    }
}
