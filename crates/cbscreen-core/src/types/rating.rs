//! Credit rating scale.
//!
//! Domestic agencies rate convertible issuers on an S&P-style letter scale,
//! usually between AAA and A-. The full scale down to D is kept so unusual
//! grades still order correctly.

use serde::{Deserialize, Serialize};

/// Normalized issuer credit rating.
///
/// The ordering is from highest quality (AAA) to lowest (D), with
/// `NotRated` sorting last.
///
/// # Examples
///
/// ```
/// use cbscreen_core::types::CreditRating;
///
/// let rating = CreditRating::parse("AA+").unwrap();
/// assert_eq!(rating, CreditRating::AAPlus);
/// assert!(rating < CreditRating::AA);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CreditRating {
    /// Highest quality
    AAA = 1,
    /// AA+
    #[serde(rename = "AA+")]
    AAPlus = 2,
    /// AA
    AA = 3,
    /// AA-
    #[serde(rename = "AA-")]
    AAMinus = 4,
    /// A+
    #[serde(rename = "A+")]
    APlus = 5,
    /// A
    A = 6,
    /// A-
    #[serde(rename = "A-")]
    AMinus = 7,
    /// BBB+
    #[serde(rename = "BBB+")]
    BBBPlus = 8,
    /// BBB
    BBB = 9,
    /// BBB-
    #[serde(rename = "BBB-")]
    BBBMinus = 10,
    /// BB+
    #[serde(rename = "BB+")]
    BBPlus = 11,
    /// BB
    BB = 12,
    /// BB-
    #[serde(rename = "BB-")]
    BBMinus = 13,
    /// B+
    #[serde(rename = "B+")]
    BPlus = 14,
    /// B
    B = 15,
    /// B-
    #[serde(rename = "B-")]
    BMinus = 16,
    /// CCC
    CCC = 17,
    /// CC
    CC = 18,
    /// C
    C = 19,
    /// Default
    D = 20,
    /// Not rated
    #[serde(rename = "NR")]
    #[default]
    NotRated = 99,
}

impl CreditRating {
    /// Returns the letter notation.
    #[must_use]
    pub fn notation(&self) -> &'static str {
        match self {
            Self::AAA => "AAA",
            Self::AAPlus => "AA+",
            Self::AA => "AA",
            Self::AAMinus => "AA-",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BBBPlus => "BBB+",
            Self::BBB => "BBB",
            Self::BBBMinus => "BBB-",
            Self::BBPlus => "BB+",
            Self::BB => "BB",
            Self::BBMinus => "BB-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CCC => "CCC",
            Self::CC => "CC",
            Self::C => "C",
            Self::D => "D",
            Self::NotRated => "NR",
        }
    }

    /// Parses a rating from letter notation (case-insensitive).
    ///
    /// Blank cells parse as `NotRated`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Some(Self::NotRated);
        }
        match s.to_uppercase().as_str() {
            "AAA" => Some(Self::AAA),
            "AA+" => Some(Self::AAPlus),
            "AA" => Some(Self::AA),
            "AA-" => Some(Self::AAMinus),
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "A-" => Some(Self::AMinus),
            "BBB+" => Some(Self::BBBPlus),
            "BBB" => Some(Self::BBB),
            "BBB-" => Some(Self::BBBMinus),
            "BB+" => Some(Self::BBPlus),
            "BB" => Some(Self::BB),
            "BB-" => Some(Self::BBMinus),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "B-" => Some(Self::BMinus),
            "CCC" => Some(Self::CCC),
            "CC" => Some(Self::CC),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "NR" | "-" | "NOT RATED" => Some(Self::NotRated),
            _ => None,
        }
    }
}

impl std::fmt::Display for CreditRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}
