//! Loader cutoffs.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Eligibility rules applied while building a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// A bond is kept only if it matures strictly more than this many days
    /// after the reference date.
    #[serde(default = "default_min_days_to_maturity")]
    pub min_days_to_maturity: i64,

    /// Issuer-name substrings marking delisting risk.
    #[serde(default = "default_distress_markers")]
    pub distress_markers: Vec<String>,
}

/// Longest maturity cutoff accepted, about a century.
pub const MAX_DAYS_TO_MATURITY: i64 = 36_500;

fn default_min_days_to_maturity() -> i64 {
    365
}

fn default_distress_markers() -> Vec<String> {
    vec!["ST".to_string(), "*".to_string()]
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_days_to_maturity: default_min_days_to_maturity(),
            distress_markers: default_distress_markers(),
        }
    }
}

impl Validate for LoaderConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.min_days_to_maturity < 0 {
            errors.push(ValidationError::new(
                "min_days_to_maturity",
                "must not be negative",
            ));
        } else if self.min_days_to_maturity > MAX_DAYS_TO_MATURITY {
            errors.push(ValidationError::new(
                "min_days_to_maturity",
                format!("must be at most {MAX_DAYS_TO_MATURITY}"),
            ));
        }
        if self.distress_markers.iter().any(|m| m.is_empty()) {
            errors.push(ValidationError::new(
                "distress_markers",
                "markers must not be empty strings",
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.min_days_to_maturity, 365);
        assert_eq!(config.distress_markers, vec!["ST", "*"]);
        assert!(config.is_valid());
    }

    #[test]
    fn test_invalid() {
        let config = LoaderConfig {
            min_days_to_maturity: -1,
            distress_markers: vec![String::new()],
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_huge_cutoff_rejected() {
        let config = LoaderConfig {
            min_days_to_maturity: i64::MAX,
            ..LoaderConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "min_days_to_maturity");

        let config = LoaderConfig {
            min_days_to_maturity: MAX_DAYS_TO_MATURITY,
            ..LoaderConfig::default()
        };
        assert!(config.is_valid());
    }
}
