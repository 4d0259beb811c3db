//! Convertible bond record.

use serde::{Deserialize, Serialize};

use super::{CreditRating, Date};

/// One convertible bond at a point in time.
///
/// Double-low score and conversion value are derived on demand from the
/// stored inputs, so they can never go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondRecord {
    /// Security code, unique within a snapshot.
    pub code: String,
    /// Bond short name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Traded price of the convertible.
    pub price: f64,
    /// Price of the underlying stock.
    pub stock_price: f64,
    /// Contractual conversion price.
    pub convert_price: f64,
    /// Convertible premium rate, in percent.
    pub premium_rate: f64,
    /// Maturity date.
    pub maturity_date: Date,
    /// Listing date, `None` while not yet trading.
    #[serde(default)]
    pub listing_date: Option<Date>,
    /// Name of the underlying stock's issuer.
    pub issuer_name: String,
    /// Outstanding size in hundreds of millions.
    #[serde(default)]
    pub remaining_size: Option<f64>,
    /// Issuer credit rating.
    #[serde(default)]
    pub credit_rating: CreditRating,
}

impl BondRecord {
    /// Creates a record from the required fields.
    ///
    /// Optional fields start empty and can be set with the `with_*` methods.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        price: f64,
        stock_price: f64,
        convert_price: f64,
        premium_rate: f64,
        maturity_date: Date,
        issuer_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            price,
            stock_price,
            convert_price,
            premium_rate,
            maturity_date,
            listing_date: None,
            issuer_name: issuer_name.into(),
            remaining_size: None,
            credit_rating: CreditRating::NotRated,
        }
    }

    /// Sets the bond short name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the listing date.
    #[must_use]
    pub fn with_listing_date(mut self, date: Date) -> Self {
        self.listing_date = Some(date);
        self
    }

    /// Sets the outstanding size.
    #[must_use]
    pub fn with_remaining_size(mut self, size: f64) -> Self {
        self.remaining_size = Some(size);
        self
    }

    /// Sets the credit rating.
    #[must_use]
    pub fn with_credit_rating(mut self, rating: CreditRating) -> Self {
        self.credit_rating = rating;
        self
    }

    /// Premium rate plus price. Lower is better.
    #[must_use]
    pub fn double_low_score(&self) -> f64 {
        self.premium_rate + self.price
    }

    /// Value of the bond if converted today: `stock_price * 100 / convert_price`.
    ///
    /// Returns `0.0` when the conversion price is not positive.
    #[must_use]
    pub fn conversion_value(&self) -> f64 {
        if self.convert_price > 0.0 {
            self.stock_price * 100.0 / self.convert_price
        } else {
            0.0
        }
    }

    /// Remaining life in years from `as_of` (ACT/365).
    #[must_use]
    pub fn years_to_maturity(&self, as_of: Date) -> f64 {
        as_of.years_until(&self.maturity_date)
    }

    /// Returns true if the issuer name carries any of the given markers.
    #[must_use]
    pub fn has_issuer_marker(&self, markers: &[String]) -> bool {
        markers
            .iter()
            .any(|m| !m.is_empty() && self.issuer_name.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> BondRecord {
        BondRecord::new(
            "123001",
            108.5,
            12.0,
            10.0,
            -9.6,
            Date::from_ymd(2030, 1, 1).unwrap(),
            "Blue Sky",
        )
    }

    #[test]
    fn test_derived_values() {
        let bond = sample();
        assert_relative_eq!(bond.double_low_score(), 98.9, epsilon = 1e-9);
        assert_relative_eq!(bond.conversion_value(), 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_double_low_tracks_inputs() {
        let mut bond = sample();
        bond.price = 120.0;
        assert_relative_eq!(bond.double_low_score(), 110.4, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_convert_price() {
        let mut bond = sample();
        bond.convert_price = 0.0;
        assert_eq!(bond.conversion_value(), 0.0);
    }

    #[test]
    fn test_issuer_markers() {
        let markers = vec!["ST".to_string(), "*".to_string()];
        let mut bond = sample();
        assert!(!bond.has_issuer_marker(&markers));
        bond.issuer_name = "*ST Foo".into();
        assert!(bond.has_issuer_marker(&markers));
        bond.issuer_name = "ST Bar".into();
        assert!(bond.has_issuer_marker(&markers));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let bond = sample();
        assert!(!bond.has_issuer_marker(&[String::new()]));
    }

    #[test]
    fn test_builder_methods() {
        let bond = sample()
            .with_name("Sky Convertible")
            .with_remaining_size(3.2)
            .with_credit_rating(CreditRating::AA);
        assert_eq!(bond.name, "Sky Convertible");
        assert_eq!(bond.remaining_size, Some(3.2));
        assert_eq!(bond.credit_rating, CreditRating::AA);
        assert!(bond.listing_date.is_none());
    }
}
