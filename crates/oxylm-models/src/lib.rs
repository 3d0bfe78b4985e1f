//! # oxylm-models
//!
//! Formula-driven linear models on top of `oxylm-core`:
//!
//! - [`lm`]: linear regression with squared-error (OLS) or absolute-error
//!   (LAD) loss, configurable missing-data and rank-deficiency policies,
//!   and normal-theory inference for the least squares fit
//! - [`base`]: coefficient tables, fit statistics, and printable summaries
//!
//! ## Example
//!
//! ```
//! use oxylm_core::data::{DataFrameBuilder, Series};
//! use oxylm_models::lm::{lm, LinearModel};
//!
//! let df = DataFrameBuilder::new()
//!     .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0]))
//!     .unwrap()
//!     .with_column("y", Series::float(vec![3.0, 5.0, 7.0, 9.0]))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let model = lm("y ~ x", &df).unwrap();
//! let coeffs = model.coefficients().unwrap();
//! assert!((coeffs[0] - 1.0).abs() < 1e-8);
//! assert!((coeffs[1] - 2.0).abs() < 1e-8);
//! ```

pub mod base;
pub mod error;
pub mod lm;

pub use base::Result;
pub use error::ModelError;
pub use lm::{lm, LinearConfig, LinearModel, LinearRegression, Loss, MissingPolicy, RankPolicy};
