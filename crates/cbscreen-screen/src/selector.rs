//! Ranked-filter screening strategies.
//!
//! Both strategies are a chain of threshold filters and stable ascending
//! sorts, each followed by a truncation. The final list is re-ordered by
//! conversion value, highest first, for presentation.
//!
//! [`consensus`] keeps only the bonds every screen agrees on.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cbscreen_config::{SelectorConfig, SizingConfig};
use cbscreen_core::{BondRecord, Date, Snapshot};

/// Which screening strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Equity-leaning: premium cap, shortlist by premium, rank by double-low.
    LowPremiumThenDoubleLow,
    /// Bond-leaning: double-low/price/premium caps, shortlist by double-low,
    /// rank by premium.
    DoubleLowThenLowPremium,
}

impl Strategy {
    /// Strategy for a given mean double-low score.
    ///
    /// A cheap market (mean below the switch) favours the equity-leaning
    /// screen; an expensive one the bond-leaning screen.
    #[must_use]
    pub fn for_mean(mean: f64, sizing: &SizingConfig) -> Self {
        if mean < sizing.strategy_switch {
            Self::LowPremiumThenDoubleLow
        } else {
            Self::DoubleLowThenLowPremium
        }
    }

    /// The ordering used for the final top-N cut.
    #[must_use]
    pub fn criterion(&self) -> RankingCriterion {
        match self {
            Self::LowPremiumThenDoubleLow => RankingCriterion::DoubleLow,
            Self::DoubleLowThenLowPremium => RankingCriterion::LowPremium,
        }
    }

    /// Short description in the upstream vocabulary.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::LowPremiumThenDoubleLow => "低溢价+双低",
            Self::DoubleLowThenLowPremium => "双低+低溢价",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowPremiumThenDoubleLow => write!(f, "low-premium"),
            Self::DoubleLowThenLowPremium => write!(f, "double-low"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "low-premium" | "low-premium-then-double-low" | "equity" => {
                Ok(Self::LowPremiumThenDoubleLow)
            }
            "double-low" | "double-low-then-low-premium" | "bond" => {
                Ok(Self::DoubleLowThenLowPremium)
            }
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Ordering applied by the final ranking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCriterion {
    /// Ascending double-low score.
    DoubleLow,
    /// Ascending premium rate.
    LowPremium,
}

impl RankingCriterion {
    /// Sort key for this criterion.
    #[must_use]
    pub fn key(&self, bond: &BondRecord) -> f64 {
        match self {
            Self::DoubleLow => bond.double_low_score(),
            Self::LowPremium => bond.premium_rate,
        }
    }
}

/// Top-N bonds picked by a screening strategy, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Snapshot date the list was built from.
    pub as_of: Date,
    /// Strategy that produced the list.
    pub strategy: Strategy,
    /// Final ranking criterion.
    pub criterion: RankingCriterion,
    /// Picks, sorted by conversion value descending.
    pub bonds: Vec<BondRecord>,
}

impl Recommendation {
    /// Number of picks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Returns true if nothing survived the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Codes in presentation order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.bonds.iter().map(|b| b.code.as_str()).collect()
    }
}

/// Stable ascending sort on `key`, then keep the first `n`.
fn take_lowest<F>(bonds: &mut Vec<BondRecord>, n: usize, key: F)
where
    F: Fn(&BondRecord) -> f64,
{
    bonds.sort_by(|a, b| key(a).total_cmp(&key(b)));
    bonds.truncate(n);
}

fn by_conversion_value_desc(a: &BondRecord, b: &BondRecord) -> Ordering {
    b.conversion_value().total_cmp(&a.conversion_value())
}

/// Runs `strategy` over `snapshot`.
///
/// Returns at most `config.top_n` bonds. When fewer bonds survive the
/// filters all of them are returned.
#[must_use]
pub fn select(snapshot: &Snapshot, strategy: Strategy, config: &SelectorConfig) -> Recommendation {
    let mut bonds = match strategy {
        Strategy::LowPremiumThenDoubleLow => {
            let params = &config.low_premium;
            let mut bonds: Vec<BondRecord> = snapshot
                .iter()
                .filter(|b| b.premium_rate < params.max_premium_rate)
                .cloned()
                .collect();
            debug!(survivors = bonds.len(), "premium cap applied");

            take_lowest(&mut bonds, params.shortlist_size, |b| b.premium_rate);
            if let Some(cap) = params.max_double_low {
                bonds.retain(|b| b.double_low_score() < cap);
            }
            take_lowest(&mut bonds, config.top_n, BondRecord::double_low_score);
            bonds
        }
        Strategy::DoubleLowThenLowPremium => {
            let params = &config.double_low;
            let mut bonds: Vec<BondRecord> = snapshot
                .iter()
                .filter(|b| {
                    b.double_low_score() < params.max_double_low
                        && params.max_price.map_or(true, |cap| b.price < cap)
                        && b.premium_rate < params.max_premium_rate
                })
                .cloned()
                .collect();
            debug!(survivors = bonds.len(), "double-low caps applied");

            take_lowest(&mut bonds, params.shortlist_size, BondRecord::double_low_score);
            take_lowest(&mut bonds, config.top_n, |b| b.premium_rate);
            bonds
        }
    };

    bonds.sort_by(by_conversion_value_desc);
    debug!(%strategy, picks = bonds.len(), "selection complete");

    Recommendation {
        as_of: snapshot.as_of(),
        strategy,
        criterion: strategy.criterion(),
        bonds,
    }
}

/// Bonds picked by every screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consensus {
    /// Snapshot date the list was built from.
    pub as_of: Date,
    /// Picks, sorted by conversion value descending.
    pub bonds: Vec<BondRecord>,
}

impl Consensus {
    /// Number of picks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Returns true if the screens share no bond.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Codes in presentation order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.bonds.iter().map(|b| b.code.as_str()).collect()
    }
}

/// Intersects both strategies with a plain double-low cut.
///
/// The plain cut keeps bonds under `double_low.max_double_low` and takes the
/// `top_n` lowest double-low scores.
#[must_use]
pub fn consensus(snapshot: &Snapshot, config: &SelectorConfig) -> Consensus {
    let mut bonds: Vec<BondRecord> = snapshot
        .iter()
        .filter(|b| b.double_low_score() < config.double_low.max_double_low)
        .cloned()
        .collect();
    take_lowest(&mut bonds, config.top_n, BondRecord::double_low_score);

    let screens = [
        select(snapshot, Strategy::LowPremiumThenDoubleLow, config),
        select(snapshot, Strategy::DoubleLowThenLowPremium, config),
    ];
    let picked: Vec<HashSet<&str>> = screens
        .iter()
        .map(|rec| rec.codes().into_iter().collect())
        .collect();
    bonds.retain(|b| picked.iter().all(|codes| codes.contains(b.code.as_str())));
    bonds.sort_by(by_conversion_value_desc);
    debug!(picks = bonds.len(), "consensus complete");

    Consensus {
        as_of: snapshot.as_of(),
        bonds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> Date {
        Date::from_ymd(2025, 9, 3).unwrap()
    }

    /// Bond whose conversion value equals `cv`.
    fn bond(code: &str, price: f64, premium: f64, cv: f64) -> BondRecord {
        BondRecord::new(
            code,
            price,
            cv / 10.0,
            10.0,
            premium,
            Date::from_ymd(2030, 1, 1).unwrap(),
            "Issuer",
        )
    }

    fn snapshot(bonds: Vec<BondRecord>) -> Snapshot {
        Snapshot::new(date(), bonds)
    }

    #[test]
    fn test_for_mean() {
        let sizing = SizingConfig::default();
        assert_eq!(
            Strategy::for_mean(159.99, &sizing),
            Strategy::LowPremiumThenDoubleLow
        );
        assert_eq!(
            Strategy::for_mean(160.0, &sizing),
            Strategy::DoubleLowThenLowPremium
        );
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!(
            "low-premium".parse::<Strategy>().unwrap(),
            Strategy::LowPremiumThenDoubleLow
        );
        assert_eq!(
            "Double_Low".parse::<Strategy>().unwrap(),
            Strategy::DoubleLowThenLowPremium
        );
        assert!("auto".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_low_premium_strategy() {
        let snap = snapshot(vec![
            bond("A", 110.0, 5.0, 100.0),  // dl 115
            bond("B", 100.0, 10.0, 120.0), // dl 110
            bond("C", 100.0, 25.0, 130.0), // premium too high
            bond("D", 130.0, 1.0, 90.0),   // dl 131
        ]);
        let config = SelectorConfig::default().with_top_n(2);

        let rec = select(&snap, Strategy::LowPremiumThenDoubleLow, &config);
        assert_eq!(rec.criterion, RankingCriterion::DoubleLow);
        // Lowest two double-low: B (110), A (115); then by conversion value
        assert_eq!(rec.codes(), vec!["B", "A"]);
    }

    #[test]
    fn test_low_premium_optional_cap() {
        let snap = snapshot(vec![
            bond("A", 110.0, 5.0, 100.0),
            bond("D", 130.0, 1.0, 90.0),
        ]);
        let mut config = SelectorConfig::default();
        let uncapped = select(&snap, Strategy::LowPremiumThenDoubleLow, &config);
        assert_eq!(uncapped.len(), 2);

        config.low_premium.max_double_low = Some(125.0);
        let capped = select(&snap, Strategy::LowPremiumThenDoubleLow, &config);
        assert_eq!(capped.codes(), vec!["A"]);
    }

    #[test]
    fn test_shortlist_applies_before_ranking() {
        // Shortlist of 1 by premium keeps only D even though A has lower dl.
        let snap = snapshot(vec![
            bond("A", 100.0, 5.0, 100.0),
            bond("D", 130.0, 1.0, 90.0),
        ]);
        let mut config = SelectorConfig::default();
        config.low_premium.shortlist_size = 1;
        let rec = select(&snap, Strategy::LowPremiumThenDoubleLow, &config);
        assert_eq!(rec.codes(), vec!["D"]);
    }

    #[test]
    fn test_double_low_strategy() {
        let snap = snapshot(vec![
            bond("A", 105.0, 15.0, 95.0),  // dl 120
            bond("B", 100.0, 10.0, 100.0), // dl 110
            bond("C", 112.0, 2.0, 110.0),  // price cap
            bond("D", 100.0, 21.0, 80.0),  // premium cap
            bond("E", 102.0, 12.0, 91.0),  // dl 114
        ]);
        let config = SelectorConfig::default().with_top_n(2);

        let rec = select(&snap, Strategy::DoubleLowThenLowPremium, &config);
        assert_eq!(rec.criterion, RankingCriterion::LowPremium);
        // Lowest two premium among survivors: B (10), E (12)
        assert_eq!(rec.codes(), vec!["B", "E"]);
    }

    #[test]
    fn test_double_low_price_cap_disabled() {
        let snap = snapshot(vec![bond("C", 112.0, 2.0, 110.0)]);
        let mut config = SelectorConfig::default();
        assert!(select(&snap, Strategy::DoubleLowThenLowPremium, &config).is_empty());

        config.double_low.max_price = None;
        assert_eq!(
            select(&snap, Strategy::DoubleLowThenLowPremium, &config).codes(),
            vec!["C"]
        );
    }

    #[test]
    fn test_fewer_than_n() {
        let snap = snapshot(vec![bond("A", 100.0, 5.0, 100.0)]);
        let rec = select(&snap, Strategy::LowPremiumThenDoubleLow, &SelectorConfig::default());
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.as_of, date());
    }

    #[test]
    fn test_empty_snapshot() {
        let rec = select(
            &Snapshot::empty(date()),
            Strategy::DoubleLowThenLowPremium,
            &SelectorConfig::default(),
        );
        assert!(rec.is_empty());
    }

    #[test]
    fn test_consensus_intersects_screens() {
        let snap = snapshot(vec![
            bond("A", 105.0, 15.0, 95.0),  // dl 120, in all three
            bond("B", 100.0, 10.0, 100.0), // dl 110, in all three
            bond("C", 112.0, 2.0, 110.0),  // price cap drops it from double-low
            bond("D", 100.0, 21.0, 80.0),  // premium cap drops it from both
            bond("E", 130.0, 3.0, 126.0),  // dl 133, over the plain cut
        ]);
        let config = SelectorConfig::default();

        let agreed = consensus(&snap, &config);
        assert_eq!(agreed.as_of, date());
        // Conversion value descending: B (100), A (95).
        assert_eq!(agreed.codes(), vec!["B", "A"]);
    }

    #[test]
    fn test_consensus_respects_top_n() {
        let snap = snapshot(vec![
            bond("A", 100.0, 5.0, 100.0),  // dl 105
            bond("B", 101.0, 6.0, 110.0),  // dl 107
            bond("C", 103.0, 7.0, 120.0),  // dl 110
        ]);
        let config = SelectorConfig::default().with_top_n(2);
        // The plain cut keeps A and B, the low-premium screen A and B and the
        // double-low screen A and B.
        assert_eq!(consensus(&snap, &config).codes(), vec!["B", "A"]);
        assert!(consensus(&Snapshot::empty(date()), &config).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let snap = snapshot(vec![
            bond("X", 100.0, 5.0, 100.0),
            bond("Y", 100.0, 5.0, 100.0),
            bond("Z", 100.0, 5.0, 100.0),
        ]);
        let config = SelectorConfig::default().with_top_n(2);
        let rec = select(&snap, Strategy::LowPremiumThenDoubleLow, &config);
        assert_eq!(rec.codes(), vec!["X", "Y"]);
    }
}
