//! Buy/sell/hold partition between two recommendations.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use cbscreen_core::BondRecord;

use crate::selector::Recommendation;

/// A bond present in both lists, with both versions kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeldBond {
    /// Today's record.
    pub current: BondRecord,
    /// The prior record.
    pub previous: BondRecord,
}

impl HeldBond {
    /// Bond code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.current.code
    }
}

/// Codes to buy, sell and hold when moving from one list to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotDiff {
    /// In current only, current order.
    pub buy: Vec<BondRecord>,
    /// In previous only, previous order.
    pub sell: Vec<BondRecord>,
    /// In both, current order.
    pub hold: Vec<HeldBond>,
}

impl SnapshotDiff {
    /// Every code touched by the diff.
    #[must_use]
    pub fn codes(&self) -> HashSet<&str> {
        self.buy
            .iter()
            .chain(&self.sell)
            .map(|b| b.code.as_str())
            .chain(self.hold.iter().map(HeldBond::code))
            .collect()
    }

    /// Returns true if there is nothing to trade.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// Diffs two recommendations by code.
#[must_use]
pub fn diff(current: &Recommendation, previous: &Recommendation) -> SnapshotDiff {
    diff_records(&current.bonds, &previous.bonds)
}

/// Diffs two record lists by code.
///
/// Codes are compared exactly. Each list is assumed to hold a code at most
/// once; for repeats the first occurrence wins.
#[must_use]
pub fn diff_records(current: &[BondRecord], previous: &[BondRecord]) -> SnapshotDiff {
    let mut prior: HashMap<&str, &BondRecord> = HashMap::with_capacity(previous.len());
    for bond in previous {
        prior.entry(bond.code.as_str()).or_insert(bond);
    }
    let now: HashSet<&str> = current.iter().map(|b| b.code.as_str()).collect();

    let mut result = SnapshotDiff::default();
    let mut seen = HashSet::with_capacity(current.len());
    for bond in current {
        if !seen.insert(bond.code.as_str()) {
            continue;
        }
        match prior.get(bond.code.as_str()) {
            Some(old) => result.hold.push(HeldBond {
                current: bond.clone(),
                previous: (*old).clone(),
            }),
            None => result.buy.push(bond.clone()),
        }
    }

    let mut sold = HashSet::new();
    result.sell = previous
        .iter()
        .filter(|b| !now.contains(b.code.as_str()) && sold.insert(b.code.as_str()))
        .cloned()
        .collect();

    debug!(
        buy = result.buy.len(),
        sell = result.sell.len(),
        hold = result.hold.len(),
        "recommendations diffed"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbscreen_core::Date;

    fn bond(code: &str, price: f64) -> BondRecord {
        BondRecord::new(code, price, 10.0, 10.0, 5.0, Date::from_ymd(2030, 1, 1).unwrap(), "X")
    }

    fn codes(bonds: &[BondRecord]) -> Vec<&str> {
        bonds.iter().map(|b| b.code.as_str()).collect()
    }

    #[test]
    fn test_buy_sell_hold() {
        let current = vec![bond("A", 120.0), bond("B", 130.0)];
        let previous = vec![bond("B", 128.0), bond("C", 101.0)];

        let d = diff_records(&current, &previous);
        assert_eq!(codes(&d.buy), vec!["A"]);
        assert_eq!(codes(&d.sell), vec!["C"]);
        assert_eq!(d.hold.len(), 1);
        assert_eq!(d.hold[0].code(), "B");
        assert_eq!(d.hold[0].current.price, 130.0);
        assert_eq!(d.hold[0].previous.price, 128.0);
        assert!(!d.is_unchanged());
    }

    #[test]
    fn test_order_preserved() {
        let current = vec![bond("Z", 1.0), bond("Y", 1.0), bond("X", 1.0)];
        let previous = vec![bond("Q", 1.0), bond("Y", 1.0), bond("P", 1.0)];
        let d = diff_records(&current, &previous);
        assert_eq!(codes(&d.buy), vec!["Z", "X"]);
        assert_eq!(codes(&d.sell), vec!["Q", "P"]);
    }

    #[test]
    fn test_empty_sides() {
        let list = vec![bond("A", 1.0)];
        let d = diff_records(&list, &[]);
        assert_eq!(codes(&d.buy), vec!["A"]);
        assert!(d.sell.is_empty() && d.hold.is_empty());

        let d = diff_records(&[], &list);
        assert_eq!(codes(&d.sell), vec!["A"]);

        let d = diff_records(&list, &list);
        assert!(d.is_unchanged());
        assert_eq!(d.hold.len(), 1);
    }

    #[test]
    fn test_codes_is_union() {
        let current = vec![bond("A", 1.0), bond("B", 1.0)];
        let previous = vec![bond("B", 1.0), bond("C", 1.0)];
        let d = diff_records(&current, &previous);
        let expected: HashSet<&str> = ["A", "B", "C"].into_iter().collect();
        assert_eq!(d.codes(), expected);
    }
}
