//! Lenient cell parsing for upstream exports.
//!
//! Provider exports mix plain numbers with percent-suffixed values and use
//! `-` for "no value". These helpers normalize both.

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Returns true if a cell holds no value.
#[must_use]
pub fn is_blank(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell == "-" || cell.eq_ignore_ascii_case("nan")
}

/// Parses a numeric cell. A trailing `%` and thousands separators are
/// accepted; the percent sign does not rescale the value.
///
/// # Errors
///
/// Returns `CoreError::InvalidNumber` for blank or non-numeric cells and
/// for non-finite values.
pub fn parse_number(column: &str, cell: &str) -> CoreResult<f64> {
    if is_blank(cell) {
        return Err(CoreError::invalid_number(column, cell));
    }
    let cleaned: String = cell
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoreError::invalid_number(column, cell)),
    }
}

/// Parses an optional numeric cell; blank cells give `Ok(None)`.
///
/// # Errors
///
/// Returns `CoreError::InvalidNumber` for non-blank, non-numeric cells.
pub fn parse_optional_number(column: &str, cell: &str) -> CoreResult<Option<f64>> {
    if is_blank(cell) {
        return Ok(None);
    }
    parse_number(column, cell).map(Some)
}

/// Parses a required date cell.
///
/// # Errors
///
/// Returns `CoreError::InvalidDate` for blank or malformed cells.
pub fn parse_date(cell: &str) -> CoreResult<Date> {
    Date::parse(cell)
}

/// Parses an optional date cell; blank cells give `Ok(None)`.
///
/// # Errors
///
/// Returns `CoreError::InvalidDate` for non-blank, malformed cells.
pub fn parse_optional_date(cell: &str) -> CoreResult<Option<Date>> {
    if is_blank(cell) {
        return Ok(None);
    }
    Date::parse(cell).map(Some)
}
