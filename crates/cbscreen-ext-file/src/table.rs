//! CSV snapshot and base-info readers.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use cbscreen_core::parse::is_blank;
use cbscreen_core::RawTable;

use crate::error::{FileError, FileResult};

/// Base-info column holding the bond code.
pub const BASE_INFO_CODE_COLUMN: &str = "债券代码";

/// Base-info column holding the listing date; blank until listed.
pub const BASE_INFO_LISTING_COLUMN: &str = "上市日期";

/// Reads a CSV file with a header row into a [`RawTable`].
pub fn read_table(path: impl AsRef<Path>) -> FileResult<RawTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| FileError::io(path, &e))?;
    let table = read_table_from(file, path)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.headers().len(),
        "csv read"
    );
    Ok(table)
}

/// Reads CSV from any reader; `path` is used only in error messages.
pub fn read_table_from<R: Read>(reader: R, path: &Path) -> FileResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FileError::csv(path, &e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FileError::csv(path, &e))?;
        // Blank lines at the end of exports.
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Loads the codes of bonds that are not listed yet.
///
/// A bond is unlisted when its base-info row has a blank listing date.
pub fn load_unlisted(path: impl AsRef<Path>) -> FileResult<HashSet<String>> {
    let path = path.as_ref();
    let table = read_table(path)?;
    let unlisted = unlisted_codes(&table, path)?;
    info!(path = %path.display(), unlisted = unlisted.len(), "base info loaded");
    Ok(unlisted)
}

fn unlisted_codes(table: &RawTable, path: &Path) -> FileResult<HashSet<String>> {
    let code = table
        .column_index(BASE_INFO_CODE_COLUMN)
        .ok_or_else(|| FileError::missing_column(path, BASE_INFO_CODE_COLUMN))?;
    let listing = table
        .column_index(BASE_INFO_LISTING_COLUMN)
        .ok_or_else(|| FileError::missing_column(path, BASE_INFO_LISTING_COLUMN))?;

    Ok(table
        .rows()
        .filter_map(Result::ok)
        .filter(|row| is_blank(&row[listing]) && !row[code].is_empty())
        .map(|row| row[code].clone())
        .collect())
}
