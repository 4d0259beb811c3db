//! Error types for the cbscreen core.
//!
//! This module defines the errors raised while building core values from
//! raw upstream data.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or unparseable date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Invalid or unparseable number.
    #[error("Invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        /// Source column name.
        column: String,
        /// The raw cell text.
        value: String,
    },

    /// Column lookup on a table that does not have it.
    #[error("Unknown column: {column}")]
    UnknownColumn {
        /// The column that was requested.
        column: String,
    },

    /// Row width does not match the header.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Header width.
        expected: usize,
        /// Cells found.
        found: usize,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid number error.
    #[must_use]
    pub fn invalid_number(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown column error.
    #[must_use]
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates a ragged row error.
    #[must_use]
    pub fn ragged_row(row: usize, expected: usize, found: usize) -> Self {
        Self::RaggedRow {
            row,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30");
        assert!(err.to_string().contains("Invalid date"));

        let err = CoreError::invalid_number("现价", "-");
        assert!(err.to_string().contains("现价"));
        assert!(err.to_string().contains("'-'"));
    }

    #[test]
    fn test_ragged_row_display() {
        let err = CoreError::ragged_row(3, 5, 4);
        assert_eq!(err.to_string(), "Row 3 has 4 cells, expected 5");
    }
}
