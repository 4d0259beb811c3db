//! Premium-rate history across dated snapshots.

use std::collections::BTreeMap;

use tracing::{debug, info};

use cbscreen_config::ColumnMap;
use cbscreen_core::parse::parse_number;
use cbscreen_core::{Date, RawTable};
use cbscreen_screen::signals::PremiumHistory;

use crate::directory::{SnapshotDirectory, SnapshotFile};
use crate::error::{FileError, FileResult};
use crate::table::read_table;

/// Maps a function over items, using rayon when the `parallel` feature is
/// enabled.
#[cfg(feature = "parallel")]
fn maybe_parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn maybe_parallel_map<T, U, F>(items: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    items.iter().map(f).collect()
}

/// Builds per-code premium-rate series from every snapshot in `directory`.
///
/// Rows are taken as exported, without eligibility filters. Rows whose code
/// or premium rate cannot be read are skipped. Histories are returned in
/// code order, each oldest first.
pub fn load_premium_history(
    directory: &SnapshotDirectory,
    columns: &ColumnMap,
) -> FileResult<Vec<PremiumHistory>> {
    let tables: Vec<FileResult<RawTable>> =
        maybe_parallel_map(directory.entries(), |entry: &SnapshotFile| read_table(&entry.path));

    let mut histories: BTreeMap<String, PremiumHistory> = BTreeMap::new();
    for (entry, table) in directory.entries().iter().zip(tables) {
        append(&mut histories, entry, &table?, columns)?;
    }

    info!(
        snapshots = directory.len(),
        bonds = histories.len(),
        "premium history loaded"
    );
    Ok(histories.into_values().collect())
}

fn append(
    histories: &mut BTreeMap<String, PremiumHistory>,
    entry: &SnapshotFile,
    table: &RawTable,
    columns: &ColumnMap,
) -> FileResult<()> {
    let code = column(table, entry, &columns.code)?;
    let premium = column(table, entry, &columns.premium_rate)?;

    let mut skipped = 0usize;
    for row in table.rows() {
        let Ok(row) = row else {
            skipped += 1;
            continue;
        };
        let key = row[code].trim();
        let Ok(rate) = parse_number(&columns.premium_rate, &row[premium]) else {
            skipped += 1;
            continue;
        };
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        push(histories, key, entry.date, rate);
    }

    if skipped > 0 {
        debug!(date = %entry.date, skipped, "rows without a premium rate");
    }
    Ok(())
}

fn push(histories: &mut BTreeMap<String, PremiumHistory>, code: &str, date: Date, rate: f64) {
    let history = histories
        .entry(code.to_string())
        .or_insert_with(|| PremiumHistory::new(code));
    // One observation per day; repeated codes in a file keep the first.
    if history.points.last().map_or(true, |p| p.date < date) {
        history.push(date, rate);
    }
}

fn column(table: &RawTable, entry: &SnapshotFile, name: &str) -> FileResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| FileError::missing_column(&entry.path, name))
}
