//! Formula-driven linear regression
//!
//! Fits a linear model in closed form via SVD-based least squares, or
//! iteratively for the least absolute deviations loss. The fitted design
//! encoding is stored so that prediction re-applies the training expansion
//! to new data rather than re-learning it.

use log::warn;
use ndarray::Axis;
use ndarray_linalg::{Inverse, LeastSquaresSvd};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use crate::base::{
    ModelError, ModelStatistics, ModelSummary, ModelType, ResidualStatistics, Result,
};
use crate::lm::result::{LinearRegressionResult, Matrix, Vector};
use crate::lm::{LinearConfig, LinearModel, Loss, MissingPolicy, RankPolicy};
use oxylm_core::data::DataFrame;
use oxylm_core::formula::{Design, DesignInfo, Formula};

// Columns whose residual norm falls below this fraction of their original
// norm during the rank screen are treated as aliased
const RANK_TOL: f64 = 1e-8;

// Floor on absolute residuals when forming IRLS weights
const IRLS_DELTA: f64 = 1e-8;

// ==================== Linear Regression Model ====================

/// Formula-driven linear regression model
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Model formula
    formula: Formula,
    /// Data
    data: Option<DataFrame>,
    /// Configuration
    config: LinearConfig,
    /// Fitted design encoding
    design_info: Option<DesignInfo>,
    /// Indices of the design columns retained after the rank screen
    kept_columns: Option<Vec<usize>>,
    /// Fitted result
    result: Option<LinearRegressionResult>,
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new(formula: &str) -> Result<Self> {
        let formula = Formula::parse(formula).map_err(ModelError::Formula)?;

        Ok(Self {
            formula,
            data: None,
            config: LinearConfig::default(),
            design_info: None,
            kept_columns: None,
            result: None,
        })
    }

    /// Set data for the model
    pub fn data(mut self, data: &DataFrame) -> Self {
        self.data = Some(data.clone());
        self
    }

    /// Set configuration
    pub fn config(mut self, config: LinearConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the missing-data policy
    pub fn missing(mut self, policy: MissingPolicy) -> Self {
        self.config.missing = policy;
        self
    }

    /// Set the rank-deficiency policy
    pub fn rank(mut self, policy: RankPolicy) -> Self {
        self.config.rank = policy;
        self
    }

    /// Set the loss function
    pub fn loss(mut self, loss: Loss) -> Self {
        self.config.loss = loss;
        self
    }

    /// Fit the model
    pub fn fit(mut self) -> Result<Self> {
        let data = self.data.as_ref().ok_or_else(|| ModelError::Custom {
            message: "No data provided".to_string(),
        })?;

        if self.formula.response.is_none() {
            return Err(ModelError::MissingResponse);
        }

        if !(0.0..1.0).contains(&self.config.confidence_level)
            || self.config.confidence_level <= 0.0
        {
            return Err(ModelError::InvalidConfig {
                message: format!(
                    "confidence level must be in (0, 1), got {}",
                    self.config.confidence_level
                ),
            });
        }

        // Exclude rows with missing values per the configured policy
        let variables = self.formula.variables();
        let mask = data
            .complete_cases(&variables)
            .map_err(ModelError::Data)?;
        let n_dropped_rows = mask.iter().filter(|&&keep| !keep).count();

        if n_dropped_rows > 0 {
            match self.config.missing {
                MissingPolicy::Error => {
                    return Err(ModelError::MissingData {
                        n_missing: n_dropped_rows,
                    });
                }
                MissingPolicy::Warn => {
                    warn!(
                        "dropping {} of {} rows with missing values",
                        n_dropped_rows,
                        data.nrows()
                    );
                }
                MissingPolicy::Silent => {}
            }
        }

        let clean = data.filter(&mask).map_err(ModelError::Data)?;

        // Build the design matrix and fit the encoding
        let design = Design::build(&self.formula, &clean).map_err(ModelError::Formula)?;
        let y = design.response.clone().ok_or(ModelError::MissingResponse)?;

        // Screen for linearly dependent columns
        let (kept, dropped_columns) = rank_screen(&design.matrix, &design.column_names);

        if !dropped_columns.is_empty() {
            match self.config.rank {
                RankPolicy::Error => {
                    return Err(ModelError::RankDeficient {
                        columns: dropped_columns,
                    });
                }
                RankPolicy::Drop => {
                    warn!("dropping aliased design columns: {:?}", dropped_columns);
                }
            }
        }

        let x = design.matrix.select(Axis(1), &kept);
        let variable_names: Vec<String> = kept
            .iter()
            .map(|&j| design.column_names[j].clone())
            .collect();

        let n = x.nrows();
        let p = x.ncols();

        if n <= p {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: p,
            });
        }

        let has_intercept = design.info.has_intercept();

        // Solve for coefficients
        let (coefficients, iterations, converged) = match self.config.loss {
            Loss::SquaredError => (svd_solve(&x, &y)?, None, None),
            Loss::AbsoluteError => {
                let (coef, iters, conv) =
                    irls_lad(&x, &y, self.config.max_iter, self.config.tol)?;
                if !conv {
                    warn!(
                        "least absolute deviations did not converge in {} iterations",
                        self.config.max_iter
                    );
                }
                (coef, Some(iters), Some(conv))
            }
        };

        let fitted_values = x.dot(&coefficients);
        let residuals = &y - &fitted_values;

        // Goodness of fit
        let rss = residuals.mapv(|r| r * r).sum();
        let y_mean = y.mean().unwrap_or(0.0);
        let tss = if has_intercept {
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum::<f64>()
        } else {
            y.iter().map(|&yi| yi * yi).sum::<f64>()
        };
        let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };
        let adj_r_squared =
            1.0 - (1.0 - r_squared) * ((n as f64 - 1.0) / (n as f64 - p as f64));
        let residual_std_error = (rss / (n as f64 - p as f64)).sqrt();
        let mean_absolute_error = residuals.mapv(f64::abs).sum() / n as f64;

        let df_model = p - usize::from(has_intercept);

        let mut model_statistics = ModelStatistics {
            r_squared: Some(r_squared),
            adj_r_squared: Some(adj_r_squared),
            residual_std_error: Some(residual_std_error),
            mean_absolute_error: Some(mean_absolute_error),
            df_residual: Some(n - p),
            df_model: Some(df_model),
            iterations,
            converged,
            ..Default::default()
        };

        // Normal-theory inference applies to the least squares fit only
        let (standard_errors, t_statistics, p_values, ci_lower, ci_upper) =
            if self.config.loss == Loss::SquaredError {
                let se = standard_errors(&x, n, p, rss)?;
                let (t, pv, lo, hi) =
                    inference(&coefficients, &se, n, p, self.config.confidence_level)?;

                if has_intercept && df_model > 0 {
                    let (f_stat, f_p) = f_statistic(rss, tss, n, p, df_model)?;
                    model_statistics.f_statistic = Some(f_stat);
                    model_statistics.f_p_value = Some(f_p);
                }

                (Some(se), Some(t), Some(pv), Some(lo), Some(hi))
            } else {
                (None, None, None, None, None)
            };

        self.design_info = Some(design.info);
        self.kept_columns = Some(kept);
        self.result = Some(LinearRegressionResult {
            coefficients,
            standard_errors,
            t_statistics,
            p_values,
            ci_lower,
            ci_upper,
            fitted_values,
            residuals,
            x,
            y,
            variable_names,
            n_dropped_rows,
            dropped_columns,
            model_statistics,
            has_intercept,
        });

        Ok(self)
    }

    /// Access the fitted result
    pub fn result(&self) -> Option<&LinearRegressionResult> {
        self.result.as_ref()
    }

    /// Whether the model has been fitted
    pub fn is_fitted(&self) -> bool {
        self.result.is_some()
    }

    /// Residuals of the fitted model against (possibly new) data
    ///
    /// The data must contain the response column and every predictor the
    /// formula references.
    pub fn residuals_on(&self, data: &DataFrame) -> Result<Vector> {
        let response = self
            .formula
            .response
            .as_ref()
            .ok_or(ModelError::MissingResponse)?;

        let series = data
            .get_column(response)
            .ok_or_else(|| ModelError::Data(oxylm_core::data::DataError::ColumnNotFound(
                response.clone(),
            )))?;
        let y = series.to_float().map_err(ModelError::Data)?;

        let predictions = self.predict(data)?;
        Ok(&y - &predictions)
    }

    /// Encode new data with the training design and select retained columns
    fn encode_new(&self, data: &DataFrame) -> Result<Matrix> {
        let info = self.design_info.as_ref().ok_or(ModelError::NotFitted)?;
        let kept = self.kept_columns.as_ref().ok_or(ModelError::NotFitted)?;

        let (_, matrix) = info.encode(data).map_err(ModelError::Formula)?;
        Ok(matrix.select(Axis(1), kept))
    }

    /// Get model summary
    pub fn summary(&self) -> Result<ModelSummary> {
        let result = self.result.as_ref().ok_or(ModelError::NotFitted)?;

        let model_type = match self.config.loss {
            Loss::SquaredError => ModelType::LinearRegression,
            Loss::AbsoluteError => ModelType::LeastAbsoluteDeviations,
        };

        let residual_statistics = ResidualStatistics {
            min: result
                .residuals
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min),
            q1: quantile(&result.residuals, 0.25),
            median: quantile(&result.residuals, 0.5),
            q3: quantile(&result.residuals, 0.75),
            max: result
                .residuals
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
            mean: result.residuals.mean().unwrap_or(0.0),
            std_dev: result.residuals.std(1.0),
        };

        Ok(ModelSummary {
            model_type,
            formula: self.formula.to_string(),
            n_obs: result.y.len(),
            n_dropped_rows: result.n_dropped_rows,
            dropped_columns: result.dropped_columns.clone(),
            n_predictors: result.coefficients.len(),
            coefficients: result.to_coefficients(),
            model_statistics: result.model_statistics,
            residual_statistics,
        })
    }
}

impl LinearModel for LinearRegression {
    fn coefficients(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.coefficients)
    }

    fn standard_errors(&self) -> Option<&Vector> {
        self.result
            .as_ref()
            .and_then(|r| r.standard_errors.as_ref())
    }

    fn predict(&self, data: &DataFrame) -> Result<Vector> {
        let result = self.result.as_ref().ok_or(ModelError::NotFitted)?;
        let x = self.encode_new(data)?;
        Ok(x.dot(&result.coefficients))
    }

    fn fitted_values(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.fitted_values)
    }

    fn residuals(&self) -> Option<&Vector> {
        self.result.as_ref().map(|r| &r.residuals)
    }
}

// ==================== Solvers ====================

/// Solve least squares via SVD
fn svd_solve(x: &Matrix, y: &Vector) -> Result<Vector> {
    x.least_squares(y)
        .map_err(|e| ModelError::NumericalError {
            message: format!("SVD least squares failed: {}", e),
            operation: "svd_solve".to_string(),
        })
        .map(|ls| ls.solution)
}

/// Least absolute deviations via iteratively reweighted least squares
///
/// Each pass solves a weighted least squares problem with weights
/// 1 / max(|r_i|, delta), which makes the weighted squared loss agree with
/// the absolute loss at the current residuals. Seeded from the least squares
/// solution. Returns (coefficients, iterations, converged).
fn irls_lad(x: &Matrix, y: &Vector, max_iter: usize, tol: f64) -> Result<(Vector, usize, bool)> {
    let n = x.nrows();
    let mut beta = svd_solve(x, y)?;

    for iter in 1..=max_iter {
        let residuals = y - &x.dot(&beta);

        let sqrt_w: Vector = residuals
            .iter()
            .map(|&r| (1.0 / r.abs().max(IRLS_DELTA)).sqrt())
            .collect();

        let mut xw = x.clone();
        for i in 0..n {
            for j in 0..x.ncols() {
                xw[[i, j]] *= sqrt_w[i];
            }
        }
        let yw: Vector = y
            .iter()
            .zip(sqrt_w.iter())
            .map(|(&yi, &wi)| yi * wi)
            .collect();

        let next = svd_solve(&xw, &yw)?;

        let delta = next
            .iter()
            .zip(beta.iter())
            .map(|(&a, &b)| (a - b).abs())
            .fold(0.0, f64::max);
        beta = next;

        if delta < tol {
            return Ok((beta, iter, true));
        }
    }

    Ok((beta, max_iter, false))
}

// ==================== Rank screening ====================

/// Detect linearly dependent design columns by modified Gram-Schmidt
///
/// Walks the columns left to right; a column whose component orthogonal to
/// the columns already accepted is negligible is reported as aliased. The
/// walk order makes the choice of dropped columns deterministic: later
/// columns lose.
fn rank_screen(x: &Matrix, names: &[String]) -> (Vec<usize>, Vec<String>) {
    let mut basis: Vec<Vector> = Vec::new();
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for j in 0..x.ncols() {
        let mut v = x.column(j).to_owned();
        let original_norm = v.dot(&v).sqrt();

        for b in &basis {
            let proj = b.dot(&v);
            v = v - &(b * proj);
        }

        let norm = v.dot(&v).sqrt();
        if norm <= RANK_TOL * original_norm.max(1.0) {
            dropped.push(names[j].clone());
        } else {
            basis.push(v / norm);
            kept.push(j);
        }
    }

    (kept, dropped)
}

// ==================== Inference ====================

/// Standard errors from the classical covariance sigma² (X'X)^{-1}
fn standard_errors(x: &Matrix, n: usize, p: usize, rss: f64) -> Result<Vector> {
    let xtx = x.t().dot(x);
    let xtx_inv = xtx.inv().map_err(|e| ModelError::NumericalError {
        message: format!("Failed to invert X'X: {}", e),
        operation: "standard_errors".to_string(),
    })?;

    let sigma2 = rss / (n as f64 - p as f64);
    let cov_matrix = &xtx_inv * sigma2;
    let std_errors = cov_matrix.diag().mapv(|v| v.sqrt().max(1e-10));

    Ok(std_errors)
}

/// t-statistics, p-values, and confidence intervals
fn inference(
    coefficients: &Vector,
    std_errors: &Vector,
    n: usize,
    p: usize,
    confidence_level: f64,
) -> Result<(Vector, Vector, Vector, Vector)> {
    let df = n - p;

    let t_statistics: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef / se)
        .collect();

    let t_dist = StudentsT::new(0.0, 1.0, df as f64).map_err(|e| ModelError::NumericalError {
        message: format!("Failed to create t-distribution: {}", e),
        operation: "inference".to_string(),
    })?;

    let p_values: Vector = t_statistics
        .iter()
        .map(|&t| {
            let p = 2.0 * (1.0 - t_dist.cdf(t.abs()));
            p.clamp(0.0, 1.0)
        })
        .collect();

    let alpha = 1.0 - confidence_level;
    let t_critical = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    let ci_lower: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef - t_critical * se)
        .collect();

    let ci_upper: Vector = coefficients
        .iter()
        .zip(std_errors.iter())
        .map(|(&coef, &se)| coef + t_critical * se)
        .collect();

    Ok((t_statistics, p_values, ci_lower, ci_upper))
}

/// Overall F-test against the intercept-only model
fn f_statistic(rss: f64, tss: f64, n: usize, p: usize, df_model: usize) -> Result<(f64, f64)> {
    let ess = tss - rss;
    let df_model = df_model as f64;
    let df_residual = (n - p) as f64;

    let f_statistic = (ess / df_model) / (rss / df_residual);

    let f_dist =
        FisherSnedecor::new(df_model, df_residual).map_err(|e| ModelError::NumericalError {
            message: format!("Failed to create F-distribution: {}", e),
            operation: "f_statistic".to_string(),
        })?;

    let f_p_value = 1.0 - f_dist.cdf(f_statistic);

    Ok((f_statistic, f_p_value))
}

/// Linear-interpolation quantile
fn quantile(data: &Vector, q: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let idx = (sorted.len() as f64 - 1.0) * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = idx - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
