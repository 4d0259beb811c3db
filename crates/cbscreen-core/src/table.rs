//! Header-indexed raw table.
//!
//! Upstream exports arrive as flat CSV files whose columns are named in the
//! source language. A `RawTable` keeps the cells as text so that parsing and
//! schema checks happen in one place (the loader), independently of how the
//! table was read.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

/// A table of string cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a table from headers and rows.
    ///
    /// Header names are trimmed (a leading UTF-8 BOM is stripped too). When a
    /// header repeats, lookups resolve to its first position. Rows whose width
    /// differs from the header are kept; [`RawTable::rows`] reports them.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }

        Self {
            headers,
            index,
            rows,
        }
    }

    /// Column names in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if the column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in file order.
    ///
    /// A row whose width differs from the header yields
    /// `CoreError::RaggedRow` in its place.
    pub fn rows(&self) -> impl Iterator<Item = CoreResult<&[String]>> + '_ {
        let expected = self.headers.len();
        self.rows.iter().enumerate().map(move |(row, cells)| {
            if cells.len() == expected {
                Ok(cells.as_slice())
            } else {
                Err(CoreError::ragged_row(row, expected, cells.len()))
            }
        })
    }

    /// Cell at `row` in the named column; `None` past the end of the table
    /// or of a short row.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownColumn` if the column does not exist.
    pub fn cell(&self, row: usize, column: &str) -> CoreResult<Option<&str>> {
        let col = self
            .column_index(column)
            .ok_or_else(|| CoreError::unknown_column(column))?;
        Ok(self
            .rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str))
    }
}
