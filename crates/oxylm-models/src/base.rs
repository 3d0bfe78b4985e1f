//! Shared types for model results
//!
//! Coefficient tables, fit statistics, and printable summaries, shared by
//! every model in the workspace.

pub use coefficient::Coefficient;
pub use statistics::ModelStatistics;
pub use statistics::ResidualStatistics;
pub use summary::ModelSummary;
pub use summary::ModelType;

pub use crate::error::ModelError;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
