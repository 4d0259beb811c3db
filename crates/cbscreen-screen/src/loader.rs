//! Snapshot loader and normalizer.
//!
//! Turns a raw export table into a [`Snapshot`] of eligible bonds. Filters
//! run in a fixed order and each drop is counted in a [`LoadReport`]:
//!
//! 1. rows that fail to parse (bad date or number, empty code)
//! 2. bonds maturing within the cutoff window
//! 3. issuers carrying a distress marker (`ST`, `*`)
//! 4. codes in the unlisted exclusion set
//! 5. repeated codes after their first occurrence
//!
//! The loader has no side effects beyond logging and is deterministic: the
//! reference date is a parameter, never read from the clock.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use cbscreen_config::{ColumnMap, LoaderConfig};
use cbscreen_core::parse::{
    is_blank, parse_date, parse_number, parse_optional_date, parse_optional_number,
};
use cbscreen_core::{BondRecord, CoreError, CoreResult, CreditRating, Date, RawTable, Snapshot};

use crate::error::{ScreenError, ScreenResult};

/// Row counts gathered while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows in the raw table.
    pub total_rows: usize,
    /// Rows that became snapshot records.
    pub kept: usize,
    /// Rows with unparseable required cells.
    pub dropped_unparseable: usize,
    /// Bonds inside the maturity cutoff.
    pub dropped_near_maturity: usize,
    /// Issuers flagged with a distress marker.
    pub dropped_distressed: usize,
    /// Bonds not yet listed.
    pub dropped_unlisted: usize,
    /// Repeated codes.
    pub dropped_duplicate: usize,
}

impl LoadReport {
    /// Total rows dropped for any reason.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped_unparseable
            + self.dropped_near_maturity
            + self.dropped_distressed
            + self.dropped_unlisted
            + self.dropped_duplicate
    }
}

/// A snapshot together with its load report.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSnapshot {
    /// Eligible bonds.
    pub snapshot: Snapshot,
    /// What was dropped and why.
    pub report: LoadReport,
}

/// Column positions resolved once per table.
struct Layout {
    code: usize,
    price: usize,
    stock_price: usize,
    convert_price: usize,
    premium_rate: usize,
    maturity_date: usize,
    issuer_name: usize,
    name: Option<usize>,
    listing_date: Option<usize>,
    remaining_size: Option<usize>,
    credit_rating: Option<usize>,
}

impl Layout {
    fn resolve(table: &RawTable, columns: &ColumnMap) -> ScreenResult<Self> {
        for (field, column) in columns.required() {
            if !table.has_column(column) {
                return Err(ScreenError::schema(column, field));
            }
        }

        let required = |column: &str| {
            table
                .column_index(column)
                .ok_or_else(|| CoreError::unknown_column(column))
        };
        let optional = |column: &str| {
            if column.is_empty() {
                None
            } else {
                table.column_index(column)
            }
        };

        Ok(Self {
            code: required(&columns.code)?,
            price: required(&columns.price)?,
            stock_price: required(&columns.stock_price)?,
            convert_price: required(&columns.convert_price)?,
            premium_rate: required(&columns.premium_rate)?,
            maturity_date: required(&columns.maturity_date)?,
            issuer_name: required(&columns.issuer_name)?,
            name: optional(&columns.name),
            listing_date: optional(&columns.listing_date),
            remaining_size: optional(&columns.remaining_size),
            credit_rating: optional(&columns.credit_rating),
        })
    }

    fn parse_row(&self, row: &[String], columns: &ColumnMap) -> CoreResult<BondRecord> {
        let code = row[self.code].trim();
        if is_blank(code) {
            return Err(CoreError::invalid_number(&columns.code, code));
        }

        let mut record = BondRecord::new(
            code,
            parse_number(&columns.price, &row[self.price])?,
            parse_number(&columns.stock_price, &row[self.stock_price])?,
            parse_number(&columns.convert_price, &row[self.convert_price])?,
            parse_number(&columns.premium_rate, &row[self.premium_rate])?,
            parse_date(&row[self.maturity_date])?,
            row[self.issuer_name].trim(),
        );

        if let Some(i) = self.name {
            record.name = row[i].trim().to_string();
        }
        // Optional cells are best effort: a malformed value reads as absent.
        if let Some(i) = self.listing_date {
            record.listing_date = parse_optional_date(&row[i]).ok().flatten();
        }
        if let Some(i) = self.remaining_size {
            record.remaining_size = parse_optional_number(&columns.remaining_size, &row[i])
                .ok()
                .flatten();
        }
        if let Some(i) = self.credit_rating {
            record.credit_rating = CreditRating::parse(&row[i]).unwrap_or_else(|| {
                debug!(code, rating = %row[i], "unrecognized credit rating");
                CreditRating::NotRated
            });
        }

        Ok(record)
    }
}

/// Builds a snapshot of eligible bonds from a raw table.
///
/// # Errors
///
/// Returns `ScreenError::Schema` naming the first required column missing
/// from `table`. Row-level problems never fail the load; they are counted
/// in the report instead.
pub fn load_snapshot(
    table: &RawTable,
    columns: &ColumnMap,
    reference_date: Date,
    unlisted: &HashSet<String>,
    config: &LoaderConfig,
) -> ScreenResult<LoadedSnapshot> {
    let layout = Layout::resolve(table, columns)?;
    let cutoff = reference_date.add_days(config.min_days_to_maturity);

    let mut report = LoadReport {
        total_rows: table.row_count(),
        ..LoadReport::default()
    };
    let mut seen = HashSet::with_capacity(table.row_count());
    let mut records = Vec::with_capacity(table.row_count());

    for (index, row) in table.rows().enumerate() {
        let record = match row.and_then(|row| layout.parse_row(row, columns)) {
            Ok(record) => record,
            Err(err) => {
                debug!(row = index, error = %err, "dropping unparseable row");
                report.dropped_unparseable += 1;
                continue;
            }
        };

        if record.maturity_date <= cutoff {
            report.dropped_near_maturity += 1;
        } else if record.has_issuer_marker(&config.distress_markers) {
            report.dropped_distressed += 1;
        } else if unlisted.contains(&record.code) {
            report.dropped_unlisted += 1;
        } else if !seen.insert(record.code.clone()) {
            report.dropped_duplicate += 1;
        } else {
            records.push(record);
        }
    }

    report.kept = records.len();

    if report.dropped_unparseable > 0 {
        warn!(
            dropped = report.dropped_unparseable,
            total = report.total_rows,
            "dropped unparseable rows"
        );
    }
    debug!(
        near_maturity = report.dropped_near_maturity,
        distressed = report.dropped_distressed,
        unlisted = report.dropped_unlisted,
        duplicate = report.dropped_duplicate,
        "eligibility filters applied"
    );
    info!(
        as_of = %reference_date,
        kept = report.kept,
        total = report.total_rows,
        "snapshot loaded"
    );

    Ok(LoadedSnapshot {
        snapshot: Snapshot::new(reference_date, records),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 8]]) -> RawTable {
        let headers = [
            "代码", "现价", "正股价", "转股价", "转股溢价率", "到期时间", "正股名称", "剩余规模",
        ];
        RawTable::new(
            headers.iter().map(|s| (*s).to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        )
    }

    fn reference() -> Date {
        Date::from_ymd(2025, 9, 3).unwrap()
    }

    fn load(t: &RawTable, unlisted: &HashSet<String>) -> ScreenResult<LoadedSnapshot> {
        load_snapshot(
            t,
            &ColumnMap::default(),
            reference(),
            unlisted,
            &LoaderConfig::default(),
        )
    }

    #[test]
    fn test_filters_in_order() {
        let t = table(&[
            ["A", "101", "9", "10", "12%", "2028-01-01", "Alpha", "3.2"],
            ["B", "-", "9", "10", "12", "2028-01-01", "Beta", "3.2"],
            ["C", "101", "9", "10", "12", "2026-09-03", "Gamma", "3.2"],
            ["D", "101", "9", "10", "12", "2028-01-01", "*ST Delta", "3.2"],
            ["E", "101", "9", "10", "12", "2028-01-01", "Echo", "3.2"],
            ["A", "99", "9", "10", "12", "2028-01-01", "Alpha", "3.2"],
            ["F", "101", "9", "10", "12", "not a date", "Fox", "3.2"],
        ]);
        let unlisted: HashSet<String> = ["E".to_string()].into_iter().collect();

        let loaded = load(&t, &unlisted).unwrap();
        assert_eq!(loaded.snapshot.codes(), vec!["A"]);
        assert_eq!(loaded.snapshot.get("A").unwrap().price, 101.0);
        assert_eq!(
            loaded.report,
            LoadReport {
                total_rows: 7,
                kept: 1,
                dropped_unparseable: 2,
                dropped_near_maturity: 1,
                dropped_distressed: 1,
                dropped_unlisted: 1,
                dropped_duplicate: 1,
            }
        );
        assert_eq!(loaded.report.dropped(), 6);
    }

    #[test]
    fn test_short_row_is_counted_not_fatal() {
        let good = table(&[["A", "101", "9", "10", "12", "2028-01-01", "Alpha", "3.2"]]);
        let short: Vec<String> = ["B", "101", "9", "10", "12", "2028-01-01", "Beta"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let t = RawTable::new(
            good.headers().to_vec(),
            vec![good.rows().next().unwrap().unwrap().to_vec(), short],
        );

        let loaded = load(&t, &HashSet::new()).unwrap();
        assert_eq!(loaded.snapshot.codes(), vec!["A"]);
        assert_eq!(loaded.report.total_rows, 2);
        assert_eq!(loaded.report.dropped_unparseable, 1);
    }

    #[test]
    fn test_maturity_cutoff_is_strict() {
        // 2025-09-03 + 365 days = 2026-09-03
        let t = table(&[
            ["AT", "101", "9", "10", "12", "2026-09-03", "X", ""],
            ["AFTER", "101", "9", "10", "12", "2026-09-04", "X", ""],
        ]);
        let loaded = load(&t, &HashSet::new()).unwrap();
        assert_eq!(loaded.snapshot.codes(), vec!["AFTER"]);
    }

    #[test]
    fn test_unbounded_cutoff_drops_everything() {
        let t = table(&[["A", "101", "9", "10", "12", "2028-01-01", "Alpha", ""]]);
        let config = LoaderConfig {
            min_days_to_maturity: i64::MAX,
            ..LoaderConfig::default()
        };
        let loaded = load_snapshot(
            &t,
            &ColumnMap::default(),
            reference(),
            &HashSet::new(),
            &config,
        )
        .unwrap();
        assert!(loaded.snapshot.is_empty());
        assert_eq!(loaded.report.dropped_near_maturity, 1);
    }

    #[test]
    fn test_missing_required_column() {
        let t = RawTable::new(vec!["代码".into(), "现价".into()], vec![]);
        let err = load(&t, &HashSet::new()).unwrap_err();
        assert_eq!(err, ScreenError::schema("正股价", "stock_price"));
    }

    #[test]
    fn test_optional_columns() {
        let t = table(&[["A", "101", "9", "10", "12", "2028-01-01", "Alpha", "-"]]);
        let loaded = load(&t, &HashSet::new()).unwrap();
        let bond = loaded.snapshot.get("A").unwrap();
        assert_eq!(bond.remaining_size, None);
        assert_eq!(bond.credit_rating, CreditRating::NotRated);
        assert!(bond.name.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let t = table(&[]);
        let loaded = load(&t, &HashSet::new()).unwrap();
        assert!(loaded.snapshot.is_empty());
        assert_eq!(loaded.report, LoadReport::default());
    }

    #[test]
    fn test_deterministic() {
        let t = table(&[
            ["A", "101", "9", "10", "12", "2028-01-01", "Alpha", "1"],
            ["B", "121", "12", "10", "1", "2029-01-01", "Beta", "2"],
        ]);
        let first = load(&t, &HashSet::new()).unwrap();
        let second = load(&t, &HashSet::new()).unwrap();
        assert_eq!(first, second);
    }
}
