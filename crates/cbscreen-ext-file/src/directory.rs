//! Dated snapshot directories.
//!
//! Daily exports are stored as `conv_YYYYMMDD.csv`. A [`SnapshotDirectory`]
//! indexes them by date so callers ask for "latest" and "previous" instead
//! of hard-coding file names.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use cbscreen_config::ScreenConfig;
use cbscreen_core::Date;
use cbscreen_screen::loader::{load_snapshot, LoadedSnapshot};

use crate::error::{FileError, FileResult};
use crate::table::read_table;

const PREFIX: &str = "conv_";
const SUFFIX: &str = ".csv";

/// One dated snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotFile {
    /// Date encoded in the file name.
    pub date: Date,
    /// Full path.
    pub path: PathBuf,
}

impl SnapshotFile {
    /// Parses the date out of a `conv_YYYYMMDD.csv` file name.
    #[must_use]
    pub fn date_from_name(name: &str) -> Option<Date> {
        let stem = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
        if stem.len() != 8 || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Date::parse(stem).ok()
    }

    /// File name for a snapshot taken on `date`.
    #[must_use]
    pub fn name_for(date: Date) -> String {
        format!(
            "{PREFIX}{:04}{:02}{:02}{SUFFIX}",
            date.year(),
            date.month(),
            date.day()
        )
    }

    /// Reads and loads this file, using its date as the reference date.
    pub fn load(
        &self,
        unlisted: &HashSet<String>,
        config: &ScreenConfig,
    ) -> FileResult<LoadedSnapshot> {
        load_file(&self.path, self.date, unlisted, config)
    }
}

/// Reads a snapshot CSV and runs the loader over it.
pub fn load_file(
    path: impl AsRef<Path>,
    reference_date: Date,
    unlisted: &HashSet<String>,
    config: &ScreenConfig,
) -> FileResult<LoadedSnapshot> {
    let table = read_table(path)?;
    Ok(load_snapshot(
        &table,
        &config.columns,
        reference_date,
        unlisted,
        &config.loader,
    )?)
}

/// Dated snapshot files in a directory, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDirectory {
    root: PathBuf,
    entries: Vec<SnapshotFile>,
}

impl SnapshotDirectory {
    /// Scans `root` for `conv_YYYYMMDD.csv` files. Other files are ignored.
    pub fn scan(root: impl AsRef<Path>) -> FileResult<Self> {
        let root = root.as_ref();
        let listing = std::fs::read_dir(root).map_err(|e| FileError::io(root, &e))?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|e| FileError::io(root, &e))?;
            let name = entry.file_name();
            let Some(date) = name.to_str().and_then(SnapshotFile::date_from_name) else {
                continue;
            };
            entries.push(SnapshotFile {
                date,
                path: entry.path(),
            });
        }
        entries.sort();

        if entries.is_empty() {
            warn!(path = %root.display(), "no dated snapshots found");
        } else {
            debug!(path = %root.display(), snapshots = entries.len(), "snapshot directory scanned");
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Directory that was scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All snapshots, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[SnapshotFile] {
        &self.entries
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no snapshots were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The newest snapshot.
    pub fn latest(&self) -> FileResult<&SnapshotFile> {
        self.entries.last().ok_or_else(|| self.no_snapshots())
    }

    /// The snapshot just before the newest, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&SnapshotFile> {
        self.entries.iter().rev().nth(1)
    }

    /// The newest snapshot dated on or before `date`.
    pub fn on_or_before(&self, date: Date) -> FileResult<&SnapshotFile> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.date <= date)
            .ok_or_else(|| self.no_snapshots())
    }

    /// The newest snapshot strictly before `date`.
    #[must_use]
    pub fn before(&self, date: Date) -> Option<&SnapshotFile> {
        self.entries.iter().rev().find(|e| e.date < date)
    }

    /// Snapshot taken exactly on `date`.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&SnapshotFile> {
        self.entries
            .binary_search_by(|e| e.date.cmp(&date))
            .ok()
            .map(|i| &self.entries[i])
    }

    fn no_snapshots(&self) -> FileError {
        FileError::NoSnapshots {
            path: self.root.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "代码\n").unwrap();
    }

    #[test]
    fn test_date_from_name() {
        assert_eq!(SnapshotFile::date_from_name("conv_20250903.csv"), Some(date(2025, 9, 3)));
        assert_eq!(SnapshotFile::date_from_name("conv_2025093.csv"), None);
        assert_eq!(SnapshotFile::date_from_name("conv_20251340.csv"), None);
        assert_eq!(SnapshotFile::date_from_name("bond_20250903.csv"), None);
        assert_eq!(SnapshotFile::date_from_name("conv_20250903.csv.bak"), None);
    }

    #[test]
    fn test_name_for() {
        assert_eq!(SnapshotFile::name_for(date(2025, 1, 7)), "conv_20250107.csv");
    }

    #[test]
    fn test_scan_orders_by_date() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "conv_20250903.csv");
        touch(dir.path(), "conv_20250829.csv");
        touch(dir.path(), "conv_20250901.csv");
        touch(dir.path(), "base_info.csv");
        touch(dir.path(), "notes.txt");

        let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
        let dates: Vec<Date> = snapshots.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2025, 8, 29), date(2025, 9, 1), date(2025, 9, 3)]);

        assert_eq!(snapshots.latest().unwrap().date, date(2025, 9, 3));
        assert_eq!(snapshots.previous().unwrap().date, date(2025, 9, 1));
        assert_eq!(snapshots.on_or_before(date(2025, 9, 2)).unwrap().date, date(2025, 9, 1));
        assert_eq!(snapshots.before(date(2025, 9, 1)).unwrap().date, date(2025, 8, 29));
        assert!(snapshots.get(date(2025, 9, 2)).is_none());
        assert!(snapshots.get(date(2025, 9, 1)).is_some());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
        assert!(snapshots.is_empty());
        assert!(matches!(snapshots.latest(), Err(FileError::NoSnapshots { .. })));
        assert!(snapshots.previous().is_none());
    }

    #[test]
    fn test_single_snapshot_has_no_previous() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "conv_20250903.csv");
        let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
        assert!(snapshots.latest().is_ok());
        assert!(snapshots.previous().is_none());
    }

    #[test]
    fn test_scan_missing_directory() {
        let err = SnapshotDirectory::scan("/nonexistent/cbscreen").unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
