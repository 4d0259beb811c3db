//! Screening strategy thresholds.
//!
//! The two ranked-filter strategies share the final list length but keep
//! their own thresholds. Historical revisions of the screen disagreed on
//! some caps (the price cap on the bond-leaning screen, the double-low cap
//! on the equity-leaning one), so those caps are optional. Setting a cap to
//! `inf` switches it off.

use serde::{Deserialize, Serialize};

use crate::error::{scoped, Validate, ValidationError};

/// Thresholds for both screening strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Maximum number of bonds in a recommendation (N).
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// "Low premium, then double-low" thresholds.
    #[serde(default)]
    pub low_premium: LowPremiumParams,

    /// "Double-low, then low premium" thresholds.
    #[serde(default)]
    pub double_low: DoubleLowParams,
}

fn default_top_n() -> usize {
    30
}

fn default_shortlist() -> usize {
    50
}

fn default_max_premium_rate() -> f64 {
    20.0
}

fn default_max_double_low() -> f64 {
    125.0
}

fn default_max_price() -> Option<f64> {
    Some(110.0)
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            low_premium: LowPremiumParams::default(),
            double_low: DoubleLowParams::default(),
        }
    }
}

impl SelectorConfig {
    /// Returns a copy with a different list length.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Equity-leaning screen: premium cap, shortlist by premium, rank by double-low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowPremiumParams {
    /// Keep bonds with premium rate strictly below this.
    #[serde(default = "default_max_premium_rate")]
    pub max_premium_rate: f64,

    /// Size of the lowest-premium shortlist.
    #[serde(default = "default_shortlist")]
    pub shortlist_size: usize,

    /// Optional double-low cap applied to the shortlist.
    #[serde(default, with = "optional_cap")]
    pub max_double_low: Option<f64>,
}

impl Default for LowPremiumParams {
    fn default() -> Self {
        Self {
            max_premium_rate: default_max_premium_rate(),
            shortlist_size: default_shortlist(),
            max_double_low: None,
        }
    }
}

/// Bond-leaning screen: double-low, price and premium caps, shortlist by
/// double-low, rank by premium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleLowParams {
    /// Keep bonds with double-low score strictly below this.
    #[serde(default = "default_max_double_low")]
    pub max_double_low: f64,

    /// Keep bonds priced strictly below this, when set.
    #[serde(default = "default_max_price", with = "optional_cap")]
    pub max_price: Option<f64>,

    /// Keep bonds with premium rate strictly below this.
    #[serde(default = "default_max_premium_rate")]
    pub max_premium_rate: f64,

    /// Size of the lowest-double-low shortlist.
    #[serde(default = "default_shortlist")]
    pub shortlist_size: usize,
}

impl Default for DoubleLowParams {
    fn default() -> Self {
        Self {
            max_double_low: default_max_double_low(),
            max_price: default_max_price(),
            max_premium_rate: default_max_premium_rate(),
            shortlist_size: default_shortlist(),
        }
    }
}

/// An unset cap is written as `inf`, since TOML has no null and a missing
/// field would read back as the default. `inf` reads back as unset.
mod optional_cap {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(cap: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(cap.unwrap_or(f64::INFINITY))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.filter(|cap| *cap != f64::INFINITY))
    }
}

fn not_nan(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
    if value.is_nan() {
        errors.push(ValidationError::new(field, "must be a number"));
    }
}

impl Validate for LowPremiumParams {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        not_nan("max_premium_rate", self.max_premium_rate, &mut errors);
        if let Some(cap) = self.max_double_low {
            not_nan("max_double_low", cap, &mut errors);
        }
        if self.shortlist_size == 0 {
            errors.push(ValidationError::new("shortlist_size", "must be at least 1"));
        }
        errors
    }
}

impl Validate for DoubleLowParams {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        not_nan("max_double_low", self.max_double_low, &mut errors);
        not_nan("max_premium_rate", self.max_premium_rate, &mut errors);
        if let Some(cap) = self.max_price {
            not_nan("max_price", cap, &mut errors);
        }
        if self.shortlist_size == 0 {
            errors.push(ValidationError::new("shortlist_size", "must be at least 1"));
        }
        errors
    }
}

impl Validate for SelectorConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.top_n == 0 {
            errors.push(ValidationError::new("top_n", "must be at least 1"));
        }
        errors.extend(scoped("low_premium", self.low_premium.validate()));
        errors.extend(scoped("double_low", self.double_low.validate()));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectorConfig::default();
        assert_eq!(config.top_n, 30);
        assert_eq!(config.low_premium.max_premium_rate, 20.0);
        assert_eq!(config.low_premium.shortlist_size, 50);
        assert_eq!(config.low_premium.max_double_low, None);
        assert_eq!(config.double_low.max_double_low, 125.0);
        assert_eq!(config.double_low.max_price, Some(110.0));
        assert!(config.is_valid());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let mut config = SelectorConfig::default().with_top_n(0);
        config.double_low.shortlist_size = 0;
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["top_n", "double_low.shortlist_size"]);
    }

    #[test]
    fn test_inf_switches_cap_off() {
        let config: DoubleLowParams = toml::from_str("max_price = inf").unwrap();
        assert_eq!(config.max_price, None);

        let config: DoubleLowParams = toml::from_str("").unwrap();
        assert_eq!(config.max_price, Some(110.0));
    }

    #[test]
    fn test_unset_cap_is_written_as_inf() {
        let config = DoubleLowParams {
            max_price: None,
            ..DoubleLowParams::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("max_price = inf"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let mut config = SelectorConfig::default();
        config.low_premium.max_premium_rate = f64::NAN;
        assert!(!config.is_valid());
    }
}
