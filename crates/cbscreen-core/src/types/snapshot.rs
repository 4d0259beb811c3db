//! Immutable, dated collection of bond records.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BondRecord, Date};

/// The investable universe on one date.
///
/// A snapshot is never mutated after construction. Filtering returns a new,
/// smaller snapshot that shares nothing mutable with its source, and cloning
/// is cheap because the records sit behind an `Arc`.
///
/// # Examples
///
/// ```
/// use cbscreen_core::types::{BondRecord, Date, Snapshot};
///
/// let as_of = Date::from_ymd(2025, 9, 3).unwrap();
/// let maturity = Date::from_ymd(2029, 1, 1).unwrap();
/// let snapshot = Snapshot::new(as_of, vec![
///     BondRecord::new("A", 101.0, 9.0, 10.0, 12.0, maturity, "Alpha"),
///     BondRecord::new("B", 130.0, 13.0, 10.0, 2.0, maturity, "Beta"),
/// ]);
///
/// let cheap = snapshot.filter(|b| b.price < 110.0);
/// assert_eq!(cheap.len(), 1);
/// assert_eq!(snapshot.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    as_of: Date,
    records: Arc<[BondRecord]>,
}

impl Snapshot {
    /// Creates a snapshot from records.
    ///
    /// Codes must be unique; if a code repeats, only its first occurrence
    /// is kept.
    #[must_use]
    pub fn new(as_of: Date, records: Vec<BondRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let records: Vec<BondRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.code.clone()))
            .collect();
        Self {
            as_of,
            records: records.into(),
        }
    }

    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty(as_of: Date) -> Self {
        Self {
            as_of,
            records: Arc::from(Vec::new()),
        }
    }

    /// Reference date of this snapshot.
    #[must_use]
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Records in load order.
    #[must_use]
    pub fn records(&self) -> &[BondRecord] {
        &self.records
    }

    /// Iterates over records in load order.
    pub fn iter(&self) -> impl Iterator<Item = &BondRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&BondRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    /// Returns true if a record with this code exists.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Codes in load order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.code.as_str()).collect()
    }

    /// Returns a new snapshot holding the records matching `predicate`.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&BondRecord) -> bool,
    {
        let records: Vec<BondRecord> = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self {
            as_of: self.as_of,
            records: records.into(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a BondRecord;
    type IntoIter = std::slice::Iter<'a, BondRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bond(code: &str, price: f64) -> BondRecord {
        BondRecord::new(
            code,
            price,
            10.0,
            10.0,
            5.0,
            Date::from_ymd(2030, 6, 1).unwrap(),
            "Issuer",
        )
    }

    fn as_of() -> Date {
        Date::from_ymd(2025, 9, 3).unwrap()
    }

    #[test]
    fn test_duplicate_codes_keep_first() {
        let snapshot = Snapshot::new(as_of(), vec![bond("A", 100.0), bond("A", 200.0), bond("B", 1.0)]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("A").unwrap().price, 100.0);
        assert_eq!(snapshot.codes(), vec!["A", "B"]);
    }

    #[test]
    fn test_filter_leaves_source_untouched() {
        let snapshot = Snapshot::new(as_of(), vec![bond("A", 100.0), bond("B", 120.0)]);
        let filtered = snapshot.filter(|b| b.price > 110.0);
        assert_eq!(filtered.codes(), vec!["B"]);
        assert_eq!(snapshot.codes(), vec!["A", "B"]);
        assert_eq!(filtered.as_of(), snapshot.as_of());
    }

    #[test]
    fn test_empty() {
        let snapshot = Snapshot::empty(as_of());
        assert!(snapshot.is_empty());
        assert!(!snapshot.contains("A"));
    }
}
