//! Position-size breakpoints.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Breakpoints on the mean double-low score.
///
/// Each `*_below` value is the exclusive upper bound of its bucket; anything
/// at or above `reduce_below` means liquidate. `strategy_switch` picks the
/// screening strategy from the same mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Full position below this mean.
    #[serde(default = "default_full")]
    pub full_position_below: f64,

    /// 60% position below this mean.
    #[serde(default = "default_sixty")]
    pub sixty_percent_below: f64,

    /// 30% position below this mean.
    #[serde(default = "default_thirty")]
    pub thirty_percent_below: f64,

    /// Normal trading below this mean.
    #[serde(default = "default_normal")]
    pub normal_trading_below: f64,

    /// Reduce below this mean; liquidate at or above.
    #[serde(default = "default_reduce")]
    pub reduce_below: f64,

    /// Equity-leaning screen below this mean, bond-leaning at or above.
    #[serde(default = "default_switch")]
    pub strategy_switch: f64,
}

fn default_full() -> f64 {
    150.0
}

fn default_sixty() -> f64 {
    155.0
}

fn default_thirty() -> f64 {
    160.0
}

fn default_normal() -> f64 {
    165.0
}

fn default_reduce() -> f64 {
    170.0
}

fn default_switch() -> f64 {
    160.0
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            full_position_below: default_full(),
            sixty_percent_below: default_sixty(),
            thirty_percent_below: default_thirty(),
            normal_trading_below: default_normal(),
            reduce_below: default_reduce(),
            strategy_switch: default_switch(),
        }
    }
}

impl SizingConfig {
    /// Bucket upper bounds in ascending order.
    #[must_use]
    pub fn breakpoints(&self) -> [f64; 5] {
        [
            self.full_position_below,
            self.sixty_percent_below,
            self.thirty_percent_below,
            self.normal_trading_below,
            self.reduce_below,
        ]
    }
}

impl Validate for SizingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let points = self.breakpoints();
        if points.iter().any(|p| !p.is_finite()) || !self.strategy_switch.is_finite() {
            errors.push(ValidationError::new("breakpoints", "must be finite numbers"));
        }
        if points.windows(2).any(|w| w[0] >= w[1]) {
            errors.push(ValidationError::new(
                "breakpoints",
                "must be strictly increasing",
            ));
        }
        errors
    }
}
