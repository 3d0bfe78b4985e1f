//! # oxylm-core
//!
//! Core data structures and formula machinery for the oxylm linear modeling
//! workspace:
//!
//! - [`data`]: typed [`Series`](data::Series) columns, the
//!   [`DataFrame`](data::DataFrame) table, and missing-value handling
//! - [`formula`]: R-style formula parsing, term expansion, and design matrix
//!   construction with a re-applicable fitted encoding
//!
//! ## Example
//!
//! ```
//! use oxylm_core::data::{DataFrame, Series};
//! use oxylm_core::formula::{Design, Formula};
//!
//! let df = DataFrame::from_columns(vec![
//!     ("y", Series::float(vec![1.0, 2.0, 3.0, 4.0])),
//!     ("x", Series::float(vec![0.5, 1.0, 1.5, 2.0])),
//!     ("g", Series::categorical(&["a", "b", "a", "b"])),
//! ])
//! .unwrap();
//!
//! let formula = Formula::parse("y ~ x + g").unwrap();
//! let design = Design::build(&formula, &df).unwrap();
//!
//! assert_eq!(design.column_names, vec!["(Intercept)", "x", "g[b]"]);
//! ```

// Link a BLAS provider for test binaries; the workspace enables ndarray's
// `blas` feature through ndarray-linalg.
#[cfg(test)]
use openblas_src as _;

pub mod data;
pub mod formula;

pub use data::{DataFrame, DataFrameBuilder, Series};
pub use formula::{Design, DesignInfo, Formula};
