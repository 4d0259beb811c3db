//! Position sizing from the market-wide mean double-low score.

use std::fmt;

use serde::Serialize;
use tracing::info;

use cbscreen_config::SizingConfig;
use cbscreen_core::{Date, Snapshot};

use crate::error::{ScreenError, ScreenResult};
use crate::selector::Strategy;

/// Suggested overall position size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSizeBucket {
    /// Fully invested.
    FullPosition,
    /// 60% invested.
    SixtyPercent,
    /// 30% invested.
    ThirtyPercent,
    /// Trade normally.
    NormalTrading,
    /// Cut exposure.
    Reduce,
    /// Exit entirely.
    Liquidate,
}

impl PositionSizeBucket {
    /// Bucket for `mean` under the half-open breakpoint table.
    #[must_use]
    pub fn from_mean(mean: f64, sizing: &SizingConfig) -> Self {
        const BUCKETS: [PositionSizeBucket; 5] = [
            PositionSizeBucket::FullPosition,
            PositionSizeBucket::SixtyPercent,
            PositionSizeBucket::ThirtyPercent,
            PositionSizeBucket::NormalTrading,
            PositionSizeBucket::Reduce,
        ];

        sizing
            .breakpoints()
            .iter()
            .zip(BUCKETS)
            .find(|(upper, _)| mean < **upper)
            .map_or(Self::Liquidate, |(_, bucket)| bucket)
    }

    /// Advice in the upstream vocabulary.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullPosition => "满仓",
            Self::SixtyPercent => "6成仓",
            Self::ThirtyPercent => "3成仓",
            Self::NormalTrading => "正常交易",
            Self::Reduce => "减仓",
            Self::Liquidate => "清仓",
        }
    }
}

impl fmt::Display for PositionSizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FullPosition => "full position",
            Self::SixtyPercent => "60% position",
            Self::ThirtyPercent => "30% position",
            Self::NormalTrading => "normal trading",
            Self::Reduce => "reduce",
            Self::Liquidate => "liquidate",
        };
        write!(f, "{s}")
    }
}

/// Arithmetic mean of double-low scores.
///
/// # Errors
///
/// Returns `ScreenError::NoEligibleBonds` for an empty snapshot.
pub fn mean_double_low(snapshot: &Snapshot) -> ScreenResult<f64> {
    mean(snapshot.iter().map(|b| b.double_low_score()))
}

fn mean(values: impl Iterator<Item = f64>) -> ScreenResult<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return Err(ScreenError::NoEligibleBonds);
    }
    Ok(sum / count as f64)
}

/// Median, averaging the two middle values for even lengths.
fn median(mut values: Vec<f64>) -> ScreenResult<f64> {
    if values.is_empty() {
        return Err(ScreenError::NoEligibleBonds);
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Ok((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Ok(values[mid])
    }
}

/// Market-wide valuation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketSummary {
    /// Number of bonds summarized.
    pub count: usize,
    /// Mean premium rate, percent.
    pub mean_premium_rate: f64,
    /// Median premium rate, percent.
    pub median_premium_rate: f64,
    /// Mean double-low score.
    pub mean_double_low: f64,
    /// Median double-low score.
    pub median_double_low: f64,
}

/// Computes the market summary of a snapshot.
///
/// # Errors
///
/// Returns `ScreenError::NoEligibleBonds` for an empty snapshot.
pub fn summarize(snapshot: &Snapshot) -> ScreenResult<MarketSummary> {
    let premiums: Vec<f64> = snapshot.iter().map(|b| b.premium_rate).collect();
    let double_lows: Vec<f64> = snapshot.iter().map(|b| b.double_low_score()).collect();

    Ok(MarketSummary {
        count: snapshot.len(),
        mean_premium_rate: mean(premiums.iter().copied())?,
        mean_double_low: mean(double_lows.iter().copied())?,
        median_premium_rate: median(premiums)?,
        median_double_low: median(double_lows)?,
    })
}

/// Market summary with the sizing and strategy decisions derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketAssessment {
    /// Snapshot date.
    pub as_of: Date,
    /// Valuation statistics.
    pub summary: MarketSummary,
    /// Suggested position size.
    pub bucket: PositionSizeBucket,
    /// Screening strategy for this market.
    pub strategy: Strategy,
}

impl MarketAssessment {
    /// Mean double-low score the decisions were taken on.
    #[must_use]
    pub fn mean_double_low(&self) -> f64 {
        self.summary.mean_double_low
    }
}

/// Assesses the market: mean double-low, bucket and strategy from one pass.
///
/// # Errors
///
/// Returns `ScreenError::NoEligibleBonds` for an empty snapshot.
pub fn assess(snapshot: &Snapshot, sizing: &SizingConfig) -> ScreenResult<MarketAssessment> {
    let summary = summarize(snapshot)?;
    let mean = summary.mean_double_low;
    let bucket = PositionSizeBucket::from_mean(mean, sizing);
    let strategy = Strategy::for_mean(mean, sizing);

    info!(
        as_of = %snapshot.as_of(),
        mean_double_low = mean,
        %bucket,
        %strategy,
        "market assessed"
    );

    Ok(MarketAssessment {
        as_of: snapshot.as_of(),
        summary,
        bucket,
        strategy,
    })
}
