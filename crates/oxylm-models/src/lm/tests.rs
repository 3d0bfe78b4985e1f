//! Tests for linear regression models

use approx::assert_abs_diff_eq;
use ndarray::array;
use rand::SeedableRng;
use rand_distr::Distribution;

use crate::{
    base::ModelError,
    lm::{lm, LinearConfig, LinearModel, LinearRegression, Loss, MissingPolicy, RankPolicy},
};
use oxylm_core::data::{DataFrame, DataFrameBuilder, Series};
use oxylm_core::formula::FormulaError;

// ==================== Test Fixtures ====================

/// Simple linear relationship: y = 1 + 2x
fn simple_linear_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .with_column("y", Series::float(vec![3.0, 5.0, 7.0, 9.0, 11.0]))
        .unwrap()
        .build()
        .unwrap()
}

/// Two groups with different means: mean(a) = 2, mean(b) = 5
fn two_group_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("g", Series::categorical(&["a", "a", "b", "b"]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 3.0, 4.0, 6.0]))
        .unwrap()
        .build()
        .unwrap()
}

/// Data with missing values in x (row 2) and y (row 4)
fn missing_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_column(
            "x",
            Series::float(vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]),
        )
        .unwrap()
        .with_column(
            "y",
            Series::float(vec![3.0, 5.0, 7.0, 9.0, f64::NAN, 13.0]),
        )
        .unwrap()
        .build()
        .unwrap()
}

/// x2 is an exact multiple of x1
fn collinear_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("x1", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .with_column("x2", Series::float(vec![2.0, 4.0, 6.0, 8.0, 10.0]))
        .unwrap()
        .with_column("y", Series::float(vec![3.0, 6.0, 9.0, 12.0, 15.0]))
        .unwrap()
        .build()
        .unwrap()
}

/// Realistic dataset with noise: y = 1 + 2x1 + 3x2 + eps
fn noisy_data() -> DataFrame {
    let n = 100;
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let noise_dist = rand_distr::Normal::new(0.0, 0.1).unwrap();

    let mut x1 = Vec::new();
    let mut x2 = Vec::new();
    let mut y = Vec::new();

    for i in 0..n {
        let x1_val = i as f64 * 0.1;
        let x2_val = (i as f64).sin();
        let y_val = 1.0 + 2.0 * x1_val + 3.0 * x2_val + noise_dist.sample(&mut rng);

        x1.push(x1_val);
        x2.push(x2_val);
        y.push(y_val);
    }

    DataFrameBuilder::new()
        .with_column("x1", Series::float(x1))
        .unwrap()
        .with_column("x2", Series::float(x2))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap()
}

// ==================== Basic Tests ====================

#[test]
fn test_basic_fit_recovers_exact_line() {
    let df = simple_linear_data();

    let model = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let coeffs = model.coefficients().unwrap();
    assert_eq!(coeffs.len(), 2);
    assert_abs_diff_eq!(coeffs[0], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(coeffs[1], 2.0, epsilon = 1e-10);

    let fitted = model.fitted_values().unwrap();
    let expected = array![3.0, 5.0, 7.0, 9.0, 11.0];
    assert_abs_diff_eq!(fitted, &expected, epsilon = 1e-10);

    let summary = model.summary().unwrap();
    assert_abs_diff_eq!(
        summary.model_statistics.r_squared.unwrap(),
        1.0,
        epsilon = 1e-10
    );
}

#[test]
fn test_residuals_sum_to_zero_with_intercept() {
    let df = noisy_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let residuals = model.residuals().unwrap();
    assert_abs_diff_eq!(residuals.sum(), 0.0, epsilon = 1e-8);
}

#[test]
fn test_fit_is_deterministic() {
    let df = noisy_data();

    let a = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();
    let b = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    assert_eq!(a.coefficients().unwrap(), b.coefficients().unwrap());
    assert_eq!(a.fitted_values().unwrap(), b.fitted_values().unwrap());
}

#[test]
fn test_no_intercept_fit() {
    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .with_column("y", Series::float(vec![2.0, 4.0, 6.0, 8.0, 10.0]))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ 0 + x")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let coeffs = model.coefficients().unwrap();
    assert_eq!(coeffs.len(), 1);
    assert_abs_diff_eq!(coeffs[0], 2.0, epsilon = 1e-10);
}

#[test]
fn test_two_level_categorical_recovers_group_means() {
    let df = two_group_data();

    let model = LinearRegression::new("y ~ g")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    // Intercept is the baseline group mean; the indicator coefficient is the
    // difference of means
    let coeffs = model.coefficients().unwrap();
    assert_eq!(coeffs.len(), 2);
    assert_abs_diff_eq!(coeffs[0], 2.0, epsilon = 1e-10);
    assert_abs_diff_eq!(coeffs[1], 3.0, epsilon = 1e-10);

    let result = model.result().unwrap();
    assert_eq!(result.variable_names, vec!["(Intercept)", "g[b]"]);
}

#[test]
fn test_interaction_term_recovery() {
    // y = 1 + 2a + 3b + 4ab, on a grid so the design is full rank
    let a_vals = [0.0, 0.0, 1.0, 1.0, 2.0, 2.0];
    let b_vals = [0.0, 1.0, 0.0, 1.0, 0.0, 2.0];
    let y_vals: Vec<f64> = a_vals
        .iter()
        .zip(b_vals.iter())
        .map(|(&a, &b)| 1.0 + 2.0 * a + 3.0 * b + 4.0 * a * b)
        .collect();

    let df = DataFrameBuilder::new()
        .with_column("a", Series::float(a_vals.to_vec()))
        .unwrap()
        .with_column("b", Series::float(b_vals.to_vec()))
        .unwrap()
        .with_column("y", Series::float(y_vals))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ a*b")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let coeffs = model.coefficients().unwrap();
    assert_eq!(coeffs.len(), 4);
    assert_abs_diff_eq!(coeffs[0], 1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(coeffs[1], 2.0, epsilon = 1e-8);
    assert_abs_diff_eq!(coeffs[2], 3.0, epsilon = 1e-8);
    assert_abs_diff_eq!(coeffs[3], 4.0, epsilon = 1e-8);
}

#[test]
fn test_additive_model_leaves_interaction_pattern_in_residuals() {
    // True model has a slope that differs by group: y = 1 + x for group a,
    // y = 1 + 4x for group b
    let n = 20;
    let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
    let g: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "a" } else { "b" }).collect();
    let y: Vec<f64> = x
        .iter()
        .zip(g.iter())
        .map(|(&xi, &gi)| if gi == "a" { 1.0 + xi } else { 1.0 + 4.0 * xi })
        .collect();

    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(x.clone()))
        .unwrap()
        .with_column("g", Series::categorical(&g))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap();

    let additive = LinearRegression::new("y ~ x + g")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();
    let interaction = LinearRegression::new("y ~ x*g")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    // The interaction model reproduces the data exactly
    let int_resid = interaction.residuals().unwrap();
    assert!(int_resid.iter().all(|r| r.abs() < 1e-8));

    // The additive model cannot: within each group its residuals trend
    // monotonically with x (the pooled slope splits the difference)
    let add_resid = additive.residuals().unwrap();
    let group_b: Vec<(f64, f64)> = (0..n)
        .filter(|i| i % 2 == 1)
        .map(|i| (x[i], add_resid[i]))
        .collect();
    let group_a: Vec<(f64, f64)> = (0..n)
        .filter(|i| i % 2 == 0)
        .map(|i| (x[i], add_resid[i]))
        .collect();

    assert!(corr(&group_b) > 0.99);
    assert!(corr(&group_a) < -0.99);
}

/// Pearson correlation of paired samples
fn corr(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let cov: f64 = pairs.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum();
    let vx: f64 = pairs.iter().map(|p| (p.0 - mx).powi(2)).sum();
    let vy: f64 = pairs.iter().map(|p| (p.1 - my).powi(2)).sum();

    cov / (vx.sqrt() * vy.sqrt())
}

// ==================== Missing Data Tests ====================

#[test]
fn test_missing_rows_dropped_with_warn_policy() {
    let df = missing_data();

    // Warn is the default policy
    let model = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let result = model.result().unwrap();
    assert_eq!(result.n_dropped_rows, 2);
    assert_eq!(result.fitted_values.len(), 4);

    // The surviving rows still sit on y = 1 + 2x
    let coeffs = model.coefficients().unwrap();
    assert_abs_diff_eq!(coeffs[0], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(coeffs[1], 2.0, epsilon = 1e-10);
}

#[test]
fn test_missing_error_policy_refuses_to_fit() {
    let df = missing_data();

    let result = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .missing(MissingPolicy::Error)
        .fit();

    match result.unwrap_err() {
        ModelError::MissingData { n_missing } => assert_eq!(n_missing, 2),
        other => panic!("Expected MissingData error, got {:?}", other),
    }
}

#[test]
fn test_missing_silent_policy_drops_quietly() {
    let df = missing_data();

    let model = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .missing(MissingPolicy::Silent)
        .fit()
        .unwrap();

    assert_eq!(model.result().unwrap().n_dropped_rows, 2);
}

#[test]
fn test_missing_in_unreferenced_column_is_ignored() {
    let df = simple_linear_data()
        .with_column("junk", Series::float(vec![f64::NAN; 5]))
        .unwrap();

    let model = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .missing(MissingPolicy::Error)
        .fit()
        .unwrap();

    assert_eq!(model.result().unwrap().n_dropped_rows, 0);
    assert_eq!(model.fitted_values().unwrap().len(), 5);
}

// ==================== Rank Deficiency Tests ====================

#[test]
fn test_collinear_columns_error_by_default() {
    let df = collinear_data();

    let result = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit();

    match result.unwrap_err() {
        ModelError::RankDeficient { columns } => {
            // The later column loses
            assert_eq!(columns, vec!["x2"]);
        }
        other => panic!("Expected RankDeficient error, got {:?}", other),
    }
}

#[test]
fn test_collinear_columns_dropped_with_drop_policy() {
    let df = collinear_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .rank(RankPolicy::Drop)
        .fit()
        .unwrap();

    let result = model.result().unwrap();
    assert_eq!(result.dropped_columns, vec!["x2"]);
    assert_eq!(result.variable_names, vec!["(Intercept)", "x1"]);

    // The reduced model still fits the data exactly: y = 3 x1
    let coeffs = model.coefficients().unwrap();
    assert_abs_diff_eq!(coeffs[0], 0.0, epsilon = 1e-8);
    assert_abs_diff_eq!(coeffs[1], 3.0, epsilon = 1e-8);
}

#[test]
fn test_constant_predictor_aliased_with_intercept() {
    let df = DataFrameBuilder::new()
        .with_column("c", Series::float(vec![1.0; 5]))
        .unwrap()
        .with_column("z", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap()
        .with_column("y", Series::float(vec![2.0, 4.0, 6.0, 8.0, 10.0]))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ c + z")
        .unwrap()
        .data(&df)
        .rank(RankPolicy::Drop)
        .fit()
        .unwrap();

    assert_eq!(model.result().unwrap().dropped_columns, vec!["c"]);
}

// ==================== Prediction Tests ====================

#[test]
fn test_prediction_on_new_data() {
    let train = simple_linear_data();
    let test = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![6.0, 7.0]))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&train)
        .fit()
        .unwrap();

    let predictions = model.predict(&test).unwrap();
    assert_abs_diff_eq!(predictions[0], 13.0, epsilon = 1e-10);
    assert_abs_diff_eq!(predictions[1], 15.0, epsilon = 1e-10);
}

#[test]
fn test_predict_on_training_data_matches_fitted() {
    let df = noisy_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let predictions = model.predict(&df).unwrap();
    let fitted = model.fitted_values().unwrap();
    assert_abs_diff_eq!(&predictions, fitted, epsilon = 1e-10);
}

#[test]
fn test_predict_reuses_training_encoding() {
    let train = DataFrameBuilder::new()
        .with_column("g", Series::categorical(&["a", "a", "b", "b", "c", "c"]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ g")
        .unwrap()
        .data(&train)
        .fit()
        .unwrap();

    // New data observes the levels in a different order; predictions must
    // still follow the training layout
    let test = DataFrameBuilder::new()
        .with_column("g", Series::categorical(&["c", "b", "a"]))
        .unwrap()
        .build()
        .unwrap();

    let predictions = model.predict(&test).unwrap();
    assert_abs_diff_eq!(predictions[0], 3.0, epsilon = 1e-10);
    assert_abs_diff_eq!(predictions[1], 2.0, epsilon = 1e-10);
    assert_abs_diff_eq!(predictions[2], 1.0, epsilon = 1e-10);
}

#[test]
fn test_predict_unknown_level_is_hard_error() {
    let train = two_group_data();

    let model = LinearRegression::new("y ~ g")
        .unwrap()
        .data(&train)
        .fit()
        .unwrap();

    let test = DataFrameBuilder::new()
        .with_column("g", Series::categorical(&["a", "z"]))
        .unwrap()
        .build()
        .unwrap();

    match model.predict(&test).unwrap_err() {
        ModelError::Formula(FormulaError::UnknownLevel { variable, level, .. }) => {
            assert_eq!(variable, "g");
            assert_eq!(level, "z");
        }
        other => panic!("Expected UnknownLevel error, got {:?}", other),
    }
}

#[test]
fn test_residuals_on_training_data() {
    let df = noisy_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let recomputed = model.residuals_on(&df).unwrap();
    let stored = model.residuals().unwrap();
    assert_abs_diff_eq!(&recomputed, stored, epsilon = 1e-10);
}

#[test]
fn test_predict_before_fit_fails() {
    let df = simple_linear_data();
    let model = LinearRegression::new("y ~ x").unwrap();

    assert!(matches!(
        model.predict(&df).unwrap_err(),
        ModelError::NotFitted
    ));
}

// ==================== Loss Function Tests ====================

#[test]
fn test_lad_resists_outlier() {
    // 21 points on y = x, with one wild response value
    let x: Vec<f64> = (0..21).map(|i| i as f64).collect();
    let mut y = x.clone();
    y[20] = 200.0;

    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(x))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap();

    let ols = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let lad = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .loss(Loss::AbsoluteError)
        .fit()
        .unwrap();

    let ols_slope = ols.coefficients().unwrap()[1];
    let lad_slope = lad.coefficients().unwrap()[1];

    // Least squares chases the outlier; absolute loss stays with the
    // majority of the data
    assert!((lad_slope - 1.0).abs() < (ols_slope - 1.0).abs());
    assert_abs_diff_eq!(lad_slope, 1.0, epsilon = 0.1);
}

#[test]
fn test_lad_matches_ols_on_clean_data() {
    let df = simple_linear_data();

    let lad = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .loss(Loss::AbsoluteError)
        .fit()
        .unwrap();

    // Exact linear data: both losses share the optimum
    let coeffs = lad.coefficients().unwrap();
    assert_abs_diff_eq!(coeffs[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(coeffs[1], 2.0, epsilon = 1e-6);

    let stats = lad.result().unwrap().model_statistics;
    assert_eq!(stats.converged, Some(true));
    assert!(stats.iterations.unwrap() >= 1);
}

#[test]
fn test_lad_reports_no_inference() {
    let df = noisy_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .loss(Loss::AbsoluteError)
        .fit()
        .unwrap();

    assert!(model.standard_errors().is_none());
    let result = model.result().unwrap();
    assert!(result.p_values.is_none());
    assert!(result.model_statistics.f_statistic.is_none());
    assert!(result.model_statistics.mean_absolute_error.is_some());
}

// ==================== Statistics Tests ====================

#[test]
fn test_inference_statistics_present_for_ols() {
    let df = noisy_data();

    let model = LinearRegression::new("y ~ x1 + x2")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    let summary = model.summary().unwrap();
    let stats = summary.model_statistics;

    assert!(stats.r_squared.is_some());
    assert!(stats.adj_r_squared.is_some());
    assert!(stats.f_statistic.is_some());
    assert!(stats.f_p_value.is_some());
    assert!(stats.residual_std_error.is_some());
    assert_eq!(stats.df_residual, Some(97));
    assert_eq!(stats.df_model, Some(2));

    let r2 = stats.r_squared.unwrap();
    assert!((0.0..=1.0).contains(&r2));
    assert!(stats.adj_r_squared.unwrap() <= r2);

    // Strong signal, tiny noise: the overall F-test rejects
    assert!(stats.f_p_value.unwrap() < 1e-6);

    // Each confidence interval brackets its estimate
    for coeff in &summary.coefficients {
        assert!(coeff.ci_lower.unwrap() <= coeff.estimate);
        assert!(coeff.estimate <= coeff.ci_upper.unwrap());
        assert!(coeff.std_error.unwrap() > 0.0);
    }
}

#[test]
fn test_summary_display() {
    let df = simple_linear_data();
    let model = lm("y ~ x", &df).unwrap();
    let summary = model.summary().unwrap();

    let display = format!("{}", summary);
    assert!(display.contains("Model Summary"));
    assert!(display.contains("Linear Regression"));
    assert!(display.contains("Coefficients"));
    assert!(display.contains("(Intercept)"));
    assert!(display.contains("R-squared"));
}

// ==================== Error Handling Tests ====================

#[test]
fn test_insufficient_data() {
    let df = DataFrameBuilder::new()
        .with_column("y", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("x1", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("x2", Series::float(vec![3.0, 5.0]))
        .unwrap()
        .with_column("x3", Series::float(vec![5.0, 8.0]))
        .unwrap()
        .build()
        .unwrap();

    let result = LinearRegression::new("y ~ x1 + x2 + x3")
        .unwrap()
        .data(&df)
        .rank(RankPolicy::Drop)
        .fit();

    assert!(matches!(
        result.unwrap_err(),
        ModelError::InsufficientData { .. }
    ));
}

#[test]
fn test_missing_variable() {
    let df = simple_linear_data();
    let result = LinearRegression::new("y ~ z").unwrap().data(&df).fit();
    assert!(matches!(result.unwrap_err(), ModelError::Data(_)));
}

#[test]
fn test_no_data_provided() {
    let result = LinearRegression::new("y ~ x").unwrap().fit();
    assert!(matches!(
        result.unwrap_err(),
        ModelError::Custom { message } if message.contains("No data provided")
    ));
}

#[test]
fn test_no_response_variable() {
    let df = simple_linear_data();
    let result = LinearRegression::new("~ x").unwrap().data(&df).fit();
    assert!(matches!(result.unwrap_err(), ModelError::MissingResponse));
}

#[test]
fn test_invalid_confidence_level() {
    let df = simple_linear_data();
    let config = LinearConfig {
        confidence_level: 1.5,
        ..LinearConfig::default()
    };

    let result = LinearRegression::new("y ~ x")
        .unwrap()
        .data(&df)
        .config(config)
        .fit();

    assert!(matches!(
        result.unwrap_err(),
        ModelError::InvalidConfig { .. }
    ));
}

// ==================== Convenience Function Tests ====================

#[test]
fn test_lm_convenience_function() {
    let df = simple_linear_data();
    let model = lm("y ~ x", &df).unwrap();

    let coeffs = model.coefficients().unwrap();
    assert_abs_diff_eq!(coeffs[0], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(coeffs[1], 2.0, epsilon = 1e-10);
}

// ==================== Basis Expansion Tests ====================

#[test]
fn test_fit_with_polynomial_basis() {
    // Quadratic relationship: y = x^2
    let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
    let y: Vec<f64> = x.iter().map(|&xi| xi * xi).collect();

    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(x.clone()))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ poly(x, 2)")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    // The quadratic basis fits a quadratic exactly
    let summary = model.summary().unwrap();
    assert_abs_diff_eq!(
        summary.model_statistics.r_squared.unwrap(),
        1.0,
        epsilon = 1e-8
    );

    // Interpolation hits the curve
    let test = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![3.25]))
        .unwrap()
        .build()
        .unwrap();
    let pred = model.predict(&test).unwrap();
    assert_abs_diff_eq!(pred[0], 3.25 * 3.25, epsilon = 1e-6);
}

#[test]
fn test_fit_with_spline_basis_extrapolates_linearly() {
    let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| (xi * 0.2).sin() + 0.1 * xi).collect();

    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(x))
        .unwrap()
        .with_column("y", Series::float(y))
        .unwrap()
        .build()
        .unwrap();

    let model = LinearRegression::new("y ~ ns(x, 4)")
        .unwrap()
        .data(&df)
        .fit()
        .unwrap();

    // Beyond the training range the spline is linear, so equally spaced
    // predictions are equally spaced
    let test = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![60.0, 70.0, 80.0]))
        .unwrap()
        .build()
        .unwrap();

    let pred = model.predict(&test).unwrap();
    let second_diff = pred[2] - 2.0 * pred[1] + pred[0];
    assert_abs_diff_eq!(second_diff, 0.0, epsilon = 1e-6);
}
