//! cbscreen Configuration Layer
//!
//! Every threshold the screening pipeline uses lives here as a named,
//! serializable setting: loader cutoffs, strategy thresholds, position-size
//! breakpoints, scoring filters, portfolio mixes, signal windows and the
//! upstream column names.
//!
//! # Example
//!
//! ```rust
//! use cbscreen_config::{ScreenConfig, Validate};
//!
//! let config = ScreenConfig::from_toml_str(r#"
//!     [selector]
//!     top_n = 20
//!
//!     [selector.double_low]
//!     max_price = 115.0
//! "#).unwrap();
//!
//! assert_eq!(config.selector.top_n, 20);
//! assert_eq!(config.selector.double_low.max_price, Some(115.0));
//! assert_eq!(config.loader.min_days_to_maturity, 365);
//! assert!(config.is_valid());
//! ```
//!
//! Any section or field left out keeps its default.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod analytics;
mod columns;
mod error;
mod loader;
mod selector;
mod sizing;

pub use analytics::{
    PortfolioConfig, RiskFactors, ScoringConfig, SignalConfig, StrategyWeights,
};
pub use columns::ColumnMap;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{LoaderConfig, MAX_DAYS_TO_MATURITY};
pub use selector::{DoubleLowParams, LowPremiumParams, SelectorConfig};
pub use sizing::SizingConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::scoped;

/// Complete screening configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Snapshot eligibility rules.
    pub loader: LoaderConfig,
    /// Screening strategy thresholds.
    pub selector: SelectorConfig,
    /// Position-size breakpoints.
    pub sizing: SizingConfig,
    /// Per-strategy scoring filters.
    pub scoring: ScoringConfig,
    /// Portfolio construction settings.
    pub portfolio: PortfolioConfig,
    /// Premium-rate signal settings.
    pub signals: SignalConfig,
    /// Upstream column names.
    pub columns: ColumnMap,
}

impl ScreenConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads and validates a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };

        config.validate_or_error()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn write_toml(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(io_err)
    }
}

impl Validate for ScreenConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = scoped("loader", self.loader.validate());
        errors.extend(scoped("selector", self.selector.validate()));
        errors.extend(scoped("sizing", self.sizing.validate()));
        errors.extend(analytics::validate_all(
            &self.scoring,
            &self.portfolio,
            &self.signals,
        ));
        errors.extend(scoped("columns", self.columns.validate()));
        errors
    }
}
