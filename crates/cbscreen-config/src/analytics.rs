//! Settings for strategy scoring, portfolio construction and trade signals.

use serde::{Deserialize, Serialize};

use cbscreen_core::CreditRating;

use crate::error::{scoped, Validate, ValidationError};

// =============================================================================
// SCORING
// =============================================================================

/// Base filter and limits for per-strategy scoring.
///
/// `min_years` and `max_premium` are scaled by the risk factor of the
/// chosen risk preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum remaining life in years (before risk scaling).
    #[serde(default = "default_min_years")]
    pub min_years: f64,

    /// Minimum outstanding size, in hundreds of millions.
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    /// Minimum bond price.
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    /// Maximum premium rate in percent (before risk scaling).
    #[serde(default = "default_max_premium")]
    pub max_premium: f64,

    /// Ratings eligible for scoring.
    #[serde(default = "default_accepted_ratings")]
    pub accepted_ratings: Vec<CreditRating>,

    /// Largest price to conversion-value gap for the par-value strategy.
    #[serde(default = "default_max_par_gap")]
    pub max_par_gap: f64,

    /// Results kept per strategy.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Risk factor per preference.
    #[serde(default)]
    pub risk_factors: RiskFactors,
}

fn default_min_years() -> f64 {
    1.0
}

fn default_min_size() -> f64 {
    1.0
}

fn default_min_price() -> f64 {
    90.0
}

fn default_max_premium() -> f64 {
    30.0
}

fn default_accepted_ratings() -> Vec<CreditRating> {
    vec![CreditRating::AAA, CreditRating::AAPlus, CreditRating::AA]
}

fn default_max_par_gap() -> f64 {
    3.0
}

fn default_max_results() -> usize {
    10
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_years: default_min_years(),
            min_size: default_min_size(),
            min_price: default_min_price(),
            max_premium: default_max_premium(),
            accepted_ratings: default_accepted_ratings(),
            max_par_gap: default_max_par_gap(),
            max_results: default_max_results(),
            risk_factors: RiskFactors::default(),
        }
    }
}

/// Multipliers applied to the scoring base filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Conservative preference.
    pub conservative: f64,
    /// Moderate preference.
    pub moderate: f64,
    /// Aggressive preference.
    pub aggressive: f64,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            conservative: 0.7,
            moderate: 1.0,
            aggressive: 1.3,
        }
    }
}

impl Validate for ScoringConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.max_results == 0 {
            errors.push(ValidationError::new("max_results", "must be at least 1"));
        }
        if self.accepted_ratings.is_empty() {
            errors.push(ValidationError::new(
                "accepted_ratings",
                "at least one rating is required",
            ));
        }
        if self.max_par_gap < 0.0 {
            errors.push(ValidationError::new("max_par_gap", "must not be negative"));
        }
        let factors = self.risk_factors;
        if [factors.conservative, factors.moderate, factors.aggressive]
            .iter()
            .any(|f| !f.is_finite() || *f <= 0.0)
        {
            errors.push(ValidationError::new(
                "risk_factors",
                "factors must be positive",
            ));
        }
        errors
    }
}

// =============================================================================
// PORTFOLIO
// =============================================================================

/// Share of the portfolio given to each scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    /// Double-low strategy share.
    pub double_low: f64,
    /// Low-premium strategy share.
    pub low_premium: f64,
    /// Par-value strategy share.
    pub par_value: f64,
}

impl StrategyWeights {
    /// Sum of the three shares.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.double_low + self.low_premium + self.par_value
    }
}

/// Portfolio construction and rebalancing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Picks taken from each strategy.
    #[serde(default = "default_max_bonds")]
    pub max_bonds: usize,

    /// Smallest weight change worth trading.
    #[serde(default = "default_rebalance_threshold")]
    pub rebalance_threshold: f64,

    /// Strategy mix for conservative investors.
    #[serde(default = "default_conservative_mix")]
    pub conservative: StrategyWeights,

    /// Strategy mix for moderate investors.
    #[serde(default = "default_moderate_mix")]
    pub moderate: StrategyWeights,

    /// Strategy mix for aggressive investors.
    #[serde(default = "default_aggressive_mix")]
    pub aggressive: StrategyWeights,
}

fn default_max_bonds() -> usize {
    10
}

fn default_rebalance_threshold() -> f64 {
    0.05
}

fn default_conservative_mix() -> StrategyWeights {
    StrategyWeights {
        double_low: 0.5,
        low_premium: 0.3,
        par_value: 0.2,
    }
}

fn default_moderate_mix() -> StrategyWeights {
    StrategyWeights {
        double_low: 0.4,
        low_premium: 0.3,
        par_value: 0.3,
    }
}

fn default_aggressive_mix() -> StrategyWeights {
    StrategyWeights {
        double_low: 0.3,
        low_premium: 0.3,
        par_value: 0.4,
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            max_bonds: default_max_bonds(),
            rebalance_threshold: default_rebalance_threshold(),
            conservative: default_conservative_mix(),
            moderate: default_moderate_mix(),
            aggressive: default_aggressive_mix(),
        }
    }
}

impl Validate for PortfolioConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.max_bonds == 0 {
            errors.push(ValidationError::new("max_bonds", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.rebalance_threshold) {
            errors.push(ValidationError::new(
                "rebalance_threshold",
                "must be between 0 and 1",
            ));
        }
        for (name, mix) in [
            ("conservative", self.conservative),
            ("moderate", self.moderate),
            ("aggressive", self.aggressive),
        ] {
            let shares = [mix.double_low, mix.low_premium, mix.par_value];
            if shares.iter().any(|s| !s.is_finite() || *s < 0.0) {
                errors.push(ValidationError::new(name, "shares must not be negative"));
            } else if (mix.total() - 1.0).abs() > 1e-9 {
                errors.push(ValidationError::new(name, "shares must sum to 1"));
            }
        }
        errors
    }
}

// =============================================================================
// SIGNALS
// =============================================================================

/// Premium-rate percentile signal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Trailing window length, in observations.
    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Buy when the latest percentile is at or below this.
    #[serde(default = "default_buy_threshold")]
    pub buy_threshold: f64,

    /// Sell when the latest percentile is at or above this.
    #[serde(default = "default_sell_threshold")]
    pub sell_threshold: f64,
}

fn default_lookback() -> usize {
    120
}

fn default_buy_threshold() -> f64 {
    0.2
}

fn default_sell_threshold() -> f64 {
    0.8
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
            buy_threshold: default_buy_threshold(),
            sell_threshold: default_sell_threshold(),
        }
    }
}

impl Validate for SignalConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.lookback == 0 {
            errors.push(ValidationError::new("lookback", "must be at least 1"));
        }
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.buy_threshold) || !in_unit(self.sell_threshold) {
            errors.push(ValidationError::new(
                "thresholds",
                "must be between 0 and 1",
            ));
        } else if self.buy_threshold >= self.sell_threshold {
            errors.push(ValidationError::new(
                "thresholds",
                "buy_threshold must be below sell_threshold",
            ));
        }
        errors
    }
}

/// All analytics settings, validated together.
pub(crate) fn validate_all(
    scoring: &ScoringConfig,
    portfolio: &PortfolioConfig,
    signals: &SignalConfig,
) -> Vec<ValidationError> {
    let mut errors = scoped("scoring", scoring.validate());
    errors.extend(scoped("portfolio", portfolio.validate()));
    errors.extend(scoped("signals", signals.validate()));
    errors
}
