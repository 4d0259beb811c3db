//! Premium-rate percentile trade signals.
//!
//! A bond whose premium rate sits near the bottom of its own recent range
//! is cheap relative to its history (buy); near the top it is rich (sell).

use std::fmt;

use serde::Serialize;
use tracing::debug;

use cbscreen_config::SignalConfig;
use cbscreen_core::Date;

/// One premium-rate observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PremiumPoint {
    /// Snapshot date.
    pub date: Date,
    /// Premium rate, percent.
    pub premium_rate: f64,
}

/// Premium-rate series for one bond, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremiumHistory {
    /// Bond code.
    pub code: String,
    /// Observations in date order.
    pub points: Vec<PremiumPoint>,
}

impl PremiumHistory {
    /// Creates an empty history for `code`.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            points: Vec::new(),
        }
    }

    /// Appends an observation.
    pub fn push(&mut self, date: Date, premium_rate: f64) {
        self.points.push(PremiumPoint { date, premium_rate });
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Premium rates in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.premium_rate)
    }
}

/// Percentile rank of the last value within the trailing `window`.
///
/// Ties share their average rank; the rank is divided by the window length,
/// so the result lies in `(0, 1]`. Returns `None` when fewer than `window`
/// values exist or `window` is zero.
#[must_use]
pub fn latest_percentile(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    let latest = *tail.last()?;

    let below = tail.iter().filter(|v| **v < latest).count();
    let equal = tail.iter().filter(|v| **v == latest).count();
    let rank = below as f64 + (equal as f64 + 1.0) / 2.0;
    Some(rank / window as f64)
}

/// Trade signal for one bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Premium near its recent low.
    Buy,
    /// Premium near its recent high.
    Sell,
    /// In between.
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
            Self::Hold => write!(f, "hold"),
        }
    }
}

/// The reading behind a signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReading {
    /// Bond code.
    pub code: String,
    /// Date of the latest observation.
    pub date: Date,
    /// Latest premium rate, percent.
    pub premium_rate: f64,
    /// Percentile of the latest premium rate in the window.
    pub percentile: f64,
    /// Resulting signal.
    pub signal: Signal,
}

/// Signals grouped by direction, each group in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeSignals {
    /// Cheap relative to history.
    pub buy: Vec<SignalReading>,
    /// Rich relative to history.
    pub sell: Vec<SignalReading>,
    /// Neither.
    pub hold: Vec<SignalReading>,
}

impl TradeSignals {
    /// All readings: buys, then sells, then holds.
    pub fn iter(&self) -> impl Iterator<Item = &SignalReading> {
        self.buy.iter().chain(&self.sell).chain(&self.hold)
    }

    /// Number of bonds with a signal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buy.len() + self.sell.len() + self.hold.len()
    }

    /// Returns true if no bond had enough history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies each history by the percentile of its latest premium rate.
///
/// Histories shorter than `config.lookback` are skipped.
#[must_use]
pub fn trade_signals(histories: &[PremiumHistory], config: &SignalConfig) -> TradeSignals {
    let mut signals = TradeSignals::default();
    let mut skipped = 0usize;

    for history in histories {
        let values: Vec<f64> = history.values().collect();
        let (Some(percentile), Some(last)) =
            (latest_percentile(&values, config.lookback), history.points.last())
        else {
            skipped += 1;
            continue;
        };

        let signal = if percentile <= config.buy_threshold {
            Signal::Buy
        } else if percentile >= config.sell_threshold {
            Signal::Sell
        } else {
            Signal::Hold
        };
        let reading = SignalReading {
            code: history.code.clone(),
            date: last.date,
            premium_rate: last.premium_rate,
            percentile,
            signal,
        };
        match signal {
            Signal::Buy => signals.buy.push(reading),
            Signal::Sell => signals.sell.push(reading),
            Signal::Hold => signals.hold.push(reading),
        }
    }

    debug!(
        buy = signals.buy.len(),
        sell = signals.sell.len(),
        hold = signals.hold.len(),
        skipped,
        lookback = config.lookback,
        "trade signals computed"
    );
    signals
}
