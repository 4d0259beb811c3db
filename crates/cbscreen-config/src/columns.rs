//! Mapping from semantic field names to upstream column names.
//!
//! Snapshot exports keep the provider's Chinese column names. The loader
//! never hard-codes them; it asks this map instead, so a differently named
//! export only needs a config change.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Source column name for each bond field.
///
/// Required columns must be present in every snapshot; optional ones are
/// read when present and left empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Security code (required).
    pub code: String,
    /// Bond short name (optional).
    pub name: String,
    /// Bond price (required).
    pub price: String,
    /// Underlying stock price (required).
    pub stock_price: String,
    /// Conversion price (required).
    pub convert_price: String,
    /// Premium rate in percent (required).
    pub premium_rate: String,
    /// Upstream double-low column (optional, informational only).
    pub double_low: String,
    /// Maturity date (required).
    pub maturity_date: String,
    /// Issuer name (required).
    pub issuer_name: String,
    /// Listing date (optional).
    pub listing_date: String,
    /// Outstanding size (optional).
    pub remaining_size: String,
    /// Credit rating (optional).
    pub credit_rating: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            code: "代码".to_string(),
            name: "转债名称".to_string(),
            price: "现价".to_string(),
            stock_price: "正股价".to_string(),
            convert_price: "转股价".to_string(),
            premium_rate: "转股溢价率".to_string(),
            double_low: "双低".to_string(),
            maturity_date: "到期时间".to_string(),
            issuer_name: "正股名称".to_string(),
            listing_date: "上市日期".to_string(),
            remaining_size: "剩余规模".to_string(),
            credit_rating: "债券评级".to_string(),
        }
    }
}

impl ColumnMap {
    /// Columns every snapshot must carry, as `(field, source column)`.
    #[must_use]
    pub fn required(&self) -> [(&'static str, &str); 7] {
        [
            ("code", self.code.as_str()),
            ("price", self.price.as_str()),
            ("stock_price", self.stock_price.as_str()),
            ("convert_price", self.convert_price.as_str()),
            ("premium_rate", self.premium_rate.as_str()),
            ("maturity_date", self.maturity_date.as_str()),
            ("issuer_name", self.issuer_name.as_str()),
        ]
    }

    /// Columns read only when present, as `(field, source column)`.
    #[must_use]
    pub fn optional(&self) -> [(&'static str, &str); 5] {
        [
            ("name", self.name.as_str()),
            ("double_low", self.double_low.as_str()),
            ("listing_date", self.listing_date.as_str()),
            ("remaining_size", self.remaining_size.as_str()),
            ("credit_rating", self.credit_rating.as_str()),
        ]
    }
}

impl Validate for ColumnMap {
    fn validate(&self) -> Vec<ValidationError> {
        self.required()
            .iter()
            .filter(|(_, column)| column.trim().is_empty())
            .map(|(field, _)| ValidationError::new(*field, "required column name is empty"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_upstream_export() {
        let columns = ColumnMap::default();
        assert_eq!(columns.code, "代码");
        assert_eq!(columns.premium_rate, "转股溢价率");
        assert_eq!(columns.maturity_date, "到期时间");
        assert!(columns.is_valid());
    }

    #[test]
    fn test_empty_required_column_rejected() {
        let columns = ColumnMap {
            price: "  ".into(),
            ..ColumnMap::default()
        };
        let errors = columns.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn test_empty_optional_column_allowed() {
        let columns = ColumnMap {
            credit_rating: String::new(),
            ..ColumnMap::default()
        };
        assert!(columns.is_valid());
    }
}
