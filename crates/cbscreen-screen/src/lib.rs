//! # cbscreen Screen
//!
//! The screening pipeline for convertible bond snapshots.
//!
//! ## Pipeline
//!
//! - [`loader`]: raw table to eligible [`Snapshot`](cbscreen_core::Snapshot)
//! - [`sizing`]: mean double-low score to position size and strategy
//! - [`selector`]: ranked-filter screens producing a [`Recommendation`], and
//!   their [`Consensus`](selector::Consensus)
//! - [`diff`]: buy/sell/hold between two recommendations
//!
//! ## Analytics
//!
//! - [`scoring`]: per-strategy scores under a risk preference
//! - [`portfolio`]: target weights and rebalancing trades
//! - [`signals`]: premium-rate percentile signals from history
//!
//! Every function here is pure: inputs are passed explicitly and nothing
//! is read from disk or the clock.
//!
//! ## Example
//!
//! ```rust
//! use cbscreen_config::ScreenConfig;
//! use cbscreen_core::prelude::*;
//! use cbscreen_screen::prelude::*;
//!
//! let maturity = Date::from_ymd(2030, 1, 1).unwrap();
//! let snapshot = Snapshot::new(
//!     Date::from_ymd(2025, 9, 3).unwrap(),
//!     vec![
//!         BondRecord::new("A", 140.0, 10.0, 10.0, 10.0, maturity, "Alpha"),
//!         BondRecord::new("B", 145.0, 12.0, 10.0, 10.0, maturity, "Beta"),
//!     ],
//! );
//!
//! // Mean double-low 152.5: 60% position, equity-leaning screen.
//! let outcome = run_screen(&snapshot, &ScreenConfig::default(), None).unwrap();
//! assert_eq!(outcome.assessment.bucket, PositionSizeBucket::SixtyPercent);
//! assert_eq!(outcome.recommendation.codes(), vec!["B", "A"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]

pub mod diff;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod portfolio;
pub mod scoring;
pub mod selector;
pub mod signals;
pub mod sizing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::diff::{diff, diff_records, HeldBond, SnapshotDiff};
    pub use crate::error::{ScreenError, ScreenResult};
    pub use crate::loader::{load_snapshot, LoadReport, LoadedSnapshot};
    pub use crate::pipeline::{diff_snapshots, run_screen, DiffOutcome, ScreenOutcome};
    pub use crate::portfolio::{
        build_portfolio, rebalance, PortfolioWeights, RebalanceAction, TradeSide,
    };
    pub use crate::scoring::{analyze, RiskPreference, ScoredBond, ScoringStrategy};
    pub use crate::selector::{
        consensus, select, Consensus, RankingCriterion, Recommendation, Strategy,
    };
    pub use crate::signals::{
        latest_percentile, trade_signals, PremiumHistory, PremiumPoint, Signal, SignalReading,
        TradeSignals,
    };
    pub use crate::sizing::{
        assess, mean_double_low, summarize, MarketAssessment, MarketSummary, PositionSizeBucket,
    };
}

pub use error::{ScreenError, ScreenResult};
