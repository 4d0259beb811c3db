//! Error types for the screening pipeline.

use cbscreen_core::CoreError;
use thiserror::Error;

/// Result type for screening operations.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Errors that can occur while screening.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    /// The raw table lacks a required column. Nothing is loaded.
    #[error("Schema error: missing column '{column}' (field {field})")]
    Schema {
        /// Source column name that was expected.
        column: String,
        /// Semantic field the column maps to.
        field: String,
    },

    /// A statistic was requested over a snapshot with no bonds.
    #[error("No eligible bonds")]
    NoEligibleBonds,

    /// Core value error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ScreenError {
    /// Create a schema error.
    #[must_use]
    pub fn schema(column: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            field: field.into(),
        }
    }
}
