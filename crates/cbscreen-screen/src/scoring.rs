//! Per-strategy scoring under a risk preference.
//!
//! A shared base filter (remaining life, size, price, premium and rating)
//! is scaled by the risk factor, then each strategy assigns a score where
//! higher is better and keeps the best few.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cbscreen_config::{PortfolioConfig, RiskFactors, ScoringConfig, StrategyWeights};
use cbscreen_core::{BondRecord, Date, Snapshot};

/// Investor risk appetite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPreference {
    /// Tighter filters, more double-low weight.
    Conservative,
    /// Baseline.
    #[default]
    Moderate,
    /// Looser filters, more par-value weight.
    Aggressive,
}

impl RiskPreference {
    /// All preferences.
    pub const ALL: [RiskPreference; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    /// Multiplier applied to the base filter.
    #[must_use]
    pub fn factor(&self, factors: &RiskFactors) -> f64 {
        match self {
            Self::Conservative => factors.conservative,
            Self::Moderate => factors.moderate,
            Self::Aggressive => factors.aggressive,
        }
    }

    /// Strategy mix for portfolio construction.
    #[must_use]
    pub fn mix(&self, config: &PortfolioConfig) -> StrategyWeights {
        match self {
            Self::Conservative => config.conservative,
            Self::Moderate => config.moderate,
            Self::Aggressive => config.aggressive,
        }
    }
}

impl fmt::Display for RiskPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conservative => write!(f, "conservative"),
            Self::Moderate => write!(f, "moderate"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl FromStr for RiskPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(format!("unknown risk preference '{other}'")),
        }
    }
}

/// Scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Low price plus premium.
    DoubleLow,
    /// Low premium rate.
    LowPremium,
    /// Price close to conversion value.
    ParValue,
}

impl ScoringStrategy {
    /// All strategies.
    pub const ALL: [ScoringStrategy; 3] = [Self::DoubleLow, Self::LowPremium, Self::ParValue];
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleLow => write!(f, "double-low"),
            Self::LowPremium => write!(f, "low-premium"),
            Self::ParValue => write!(f, "par-value"),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "double-low" => Ok(Self::DoubleLow),
            "low-premium" => Ok(Self::LowPremium),
            "par-value" => Ok(Self::ParValue),
            other => Err(format!("unknown scoring strategy '{other}'")),
        }
    }
}

/// A bond with its strategy score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBond {
    /// The scored bond.
    pub bond: BondRecord,
    /// Strategy that scored it.
    pub strategy: ScoringStrategy,
    /// Higher is better.
    pub score: f64,
    /// Short explanation of the score.
    pub reason: String,
}

/// Applies the risk-scaled base filter.
fn passes_base_filter(bond: &BondRecord, as_of: Date, factor: f64, config: &ScoringConfig) -> bool {
    bond.years_to_maturity(as_of) >= config.min_years * factor
        && bond.remaining_size.is_some_and(|size| size >= config.min_size)
        && bond.price >= config.min_price
        && bond.premium_rate <= config.max_premium * factor
        && config.accepted_ratings.contains(&bond.credit_rating)
}

fn score(
    bond: &BondRecord,
    strategy: ScoringStrategy,
    config: &ScoringConfig,
) -> Option<(f64, String)> {
    match strategy {
        ScoringStrategy::DoubleLow => {
            let dl = bond.double_low_score();
            Some((100.0 - dl, format!("double-low {dl:.1}")))
        }
        ScoringStrategy::LowPremium => Some((
            100.0 - bond.premium_rate,
            format!("premium {:.1}%", bond.premium_rate),
        )),
        ScoringStrategy::ParValue => {
            let gap = (bond.price - bond.conversion_value()).abs();
            (gap <= config.max_par_gap)
                .then(|| (100.0 - gap * 10.0, format!("par gap {gap:.1}")))
        }
    }
}

/// Scores `snapshot` under `strategy` and `risk`.
///
/// Returns at most `config.max_results` bonds ordered by score, highest
/// first. Remaining life is measured from the snapshot date. Bonds with an
/// unknown size never pass the size filter.
#[must_use]
pub fn analyze(
    snapshot: &Snapshot,
    strategy: ScoringStrategy,
    risk: RiskPreference,
    config: &ScoringConfig,
) -> Vec<ScoredBond> {
    let factor = risk.factor(&config.risk_factors);

    let eligible: Vec<&BondRecord> = snapshot
        .iter()
        .filter(|b| passes_base_filter(b, snapshot.as_of(), factor, config))
        .collect();
    if eligible.is_empty() {
        warn!(%strategy, %risk, "no bonds pass the scoring filter");
        return Vec::new();
    }
    debug!(%strategy, %risk, eligible = eligible.len(), "scoring filter applied");

    let mut scored: Vec<ScoredBond> = eligible
        .into_iter()
        .filter_map(|bond| {
            score(bond, strategy, config).map(|(score, reason)| ScoredBond {
                bond: bond.clone(),
                strategy,
                score,
                reason,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(config.max_results);
    scored
}
