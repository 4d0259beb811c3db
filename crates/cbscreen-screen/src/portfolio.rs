//! Target portfolio construction and rebalancing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cbscreen_config::{PortfolioConfig, ScoringConfig};
use cbscreen_core::Snapshot;

use crate::scoring::{analyze, RiskPreference, ScoredBond, ScoringStrategy};

/// Portfolio weights keyed by bond code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioWeights(BTreeMap<String, f64>);

impl PortfolioWeights {
    /// Creates an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to the position in `code`.
    pub fn add(&mut self, code: impl Into<String>, weight: f64) {
        *self.0.entry(code.into()).or_insert(0.0) += weight;
    }

    /// Weight held in `code`, zero if absent.
    #[must_use]
    pub fn weight(&self, code: &str) -> f64 {
        self.0.get(code).copied().unwrap_or(0.0)
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Positions in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(code, weight)| (code.as_str(), *weight))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PortfolioWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut weights = Self::new();
        for (code, weight) in iter {
            weights.add(code, weight);
        }
        weights
    }
}

/// Builds a target portfolio mixing the three scoring strategies.
///
/// Each strategy's share of the mix is split equally across its first
/// `config.max_bonds` picks. A bond picked by several strategies collects
/// each share. A strategy with no picks leaves its share in cash, so the
/// total can fall below one.
#[must_use]
pub fn build_portfolio(
    snapshot: &Snapshot,
    risk: RiskPreference,
    scoring: &ScoringConfig,
    config: &PortfolioConfig,
) -> PortfolioWeights {
    let mix = risk.mix(config);
    let mut weights = PortfolioWeights::new();

    for (strategy, share) in [
        (ScoringStrategy::DoubleLow, mix.double_low),
        (ScoringStrategy::LowPremium, mix.low_premium),
        (ScoringStrategy::ParValue, mix.par_value),
    ] {
        let picks: Vec<ScoredBond> = analyze(snapshot, strategy, risk, scoring)
            .into_iter()
            .take(config.max_bonds)
            .collect();
        if picks.is_empty() {
            debug!(%strategy, share, "strategy has no picks");
            continue;
        }
        let each = share / picks.len() as f64;
        for pick in picks {
            weights.add(pick.bond.code, each);
        }
    }

    info!(%risk, positions = weights.len(), invested = weights.total(), "portfolio built");
    weights
}

/// Direction of a rebalancing trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Increase the position.
    Buy,
    /// Decrease the position.
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// One weight change needed to reach the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceAction {
    /// Bond code.
    pub code: String,
    /// Trade direction.
    pub side: TradeSide,
    /// Weight held now.
    pub current_weight: f64,
    /// Weight wanted.
    pub target_weight: f64,
    /// Absolute weight to trade.
    pub amount: f64,
}

/// Weight changes moving `current` to `target`, in code order.
///
/// Changes smaller than `threshold` are skipped.
#[must_use]
pub fn rebalance(
    current: &PortfolioWeights,
    target: &PortfolioWeights,
    threshold: f64,
) -> Vec<RebalanceAction> {
    let codes: BTreeSet<&str> = current.iter().chain(target.iter()).map(|(c, _)| c).collect();

    codes
        .into_iter()
        .filter_map(|code| {
            let current_weight = current.weight(code);
            let target_weight = target.weight(code);
            let change = target_weight - current_weight;
            // Tolerance absorbs float noise from summed shares.
            if change.abs() + 1e-12 < threshold || change == 0.0 {
                return None;
            }
            Some(RebalanceAction {
                code: code.to_string(),
                side: if change > 0.0 { TradeSide::Buy } else { TradeSide::Sell },
                current_weight,
                target_weight,
                amount: change.abs(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cbscreen_core::{BondRecord, CreditRating, Date};

    fn bond(code: &str, price: f64, premium: f64, conversion_value: f64) -> BondRecord {
        BondRecord::new(
            code,
            price,
            conversion_value / 10.0,
            10.0,
            premium,
            Date::from_ymd(2029, 1, 1).unwrap(),
            "Issuer",
        )
        .with_remaining_size(3.0)
        .with_credit_rating(CreditRating::AAPlus)
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            Date::from_ymd(2025, 9, 3).unwrap(),
            vec![
                bond("A", 100.0, 0.0, 100.0),
                bond("B", 105.0, 10.0, 95.0),
                bond("C", 120.0, 25.0, 96.0),
            ],
        )
    }

    #[test]
    fn test_build_portfolio_moderate() {
        let weights = build_portfolio(
            &snapshot(),
            RiskPreference::Moderate,
            &ScoringConfig::default(),
            &PortfolioConfig::default(),
        );
        // Double-low and low-premium pick all three; par value picks only A.
        assert_relative_eq!(weights.weight("A"), 0.4 / 3.0 + 0.3 / 3.0 + 0.3, epsilon = 1e-12);
        assert_relative_eq!(weights.weight("B"), 0.4 / 3.0 + 0.3 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(weights.total(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_bonds_limits_picks() {
        let config = PortfolioConfig {
            max_bonds: 1,
            ..PortfolioConfig::default()
        };
        let weights = build_portfolio(
            &snapshot(),
            RiskPreference::Conservative,
            &ScoringConfig::default(),
            &config,
        );
        // Every strategy ranks A first.
        assert_eq!(weights.len(), 1);
        assert_relative_eq!(weights.weight("A"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_snapshot_gives_cash() {
        let empty = Snapshot::empty(Date::from_ymd(2025, 9, 3).unwrap());
        let weights = build_portfolio(
            &empty,
            RiskPreference::Aggressive,
            &ScoringConfig::default(),
            &PortfolioConfig::default(),
        );
        assert!(weights.is_empty());
        assert_eq!(weights.total(), 0.0);
    }

    #[test]
    fn test_rebalance() {
        let current: PortfolioWeights = [("A", 0.5), ("B", 0.3), ("C", 0.2)].into_iter().collect();
        let target: PortfolioWeights = [("A", 0.52), ("B", 0.1), ("D", 0.38)].into_iter().collect();

        let actions = rebalance(&current, &target, 0.05);
        let summary: Vec<(&str, TradeSide)> =
            actions.iter().map(|a| (a.code.as_str(), a.side)).collect();
        assert_eq!(
            summary,
            vec![
                ("B", TradeSide::Sell),
                ("C", TradeSide::Sell),
                ("D", TradeSide::Buy),
            ]
        );
        assert_relative_eq!(actions[0].amount, 0.2, epsilon = 1e-12);
        assert_relative_eq!(actions[2].target_weight, 0.38);
    }

    #[test]
    fn test_rebalance_threshold_inclusive() {
        let current: PortfolioWeights = [("A", 0.3)].into_iter().collect();
        let target: PortfolioWeights = [("A", 0.35)].into_iter().collect();
        assert_eq!(rebalance(&current, &target, 0.05).len(), 1);
        assert!(rebalance(&current, &current, 0.0).is_empty());
    }
}
