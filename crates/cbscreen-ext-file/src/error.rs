//! Error types for file adapters.

use std::path::Path;

use cbscreen_screen::ScreenError;
use thiserror::Error;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised while reading snapshot files.
#[derive(Error, Debug)]
pub enum FileError {
    /// Filesystem error.
    #[error("I/O error at {path}: {message}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// Malformed CSV.
    #[error("CSV error in {path}: {message}")]
    Csv {
        /// File being parsed.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// A file lacks a column the adapter needs.
    #[error("{path} has no '{column}' column")]
    MissingColumn {
        /// File being parsed.
        path: String,
        /// Missing column name.
        column: String,
    },

    /// A directory holds no dated snapshot files.
    #[error("No conv_YYYYMMDD.csv snapshots found in {path}")]
    NoSnapshots {
        /// Directory scanned.
        path: String,
    },

    /// The loaded table failed screening (e.g. a missing required column).
    #[error(transparent)]
    Screen(#[from] ScreenError),
}

impl FileError {
    pub(crate) fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn csv(path: &Path, err: &csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn missing_column(path: &Path, column: &str) -> Self {
        Self::MissingColumn {
            path: path.display().to_string(),
            column: column.to_string(),
        }
    }
}
