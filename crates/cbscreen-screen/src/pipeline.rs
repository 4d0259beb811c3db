//! End-to-end screening runs over loaded snapshots.

use serde::Serialize;
use tracing::warn;

use cbscreen_config::ScreenConfig;
use cbscreen_core::Snapshot;

use crate::diff::{diff, SnapshotDiff};
use crate::error::ScreenResult;
use crate::selector::{select, Recommendation, Strategy};
use crate::sizing::{assess, MarketAssessment};

/// Assessment and recommendation for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenOutcome {
    /// Market statistics, bucket and chosen strategy.
    pub assessment: MarketAssessment,
    /// Screen result.
    pub recommendation: Recommendation,
}

/// Assesses `snapshot` and runs the screen.
///
/// `strategy` overrides the strategy picked from the mean double-low score.
///
/// # Errors
///
/// Returns `ScreenError::NoEligibleBonds` for an empty snapshot.
pub fn run_screen(
    snapshot: &Snapshot,
    config: &ScreenConfig,
    strategy: Option<Strategy>,
) -> ScreenResult<ScreenOutcome> {
    let assessment = assess(snapshot, &config.sizing)?;
    let strategy = strategy.unwrap_or(assessment.strategy);
    let recommendation = select(snapshot, strategy, &config.selector);
    Ok(ScreenOutcome {
        assessment,
        recommendation,
    })
}

/// Outcome of comparing two snapshots under one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffOutcome {
    /// Assessment of the current snapshot; `None` when it is empty.
    pub assessment: Option<MarketAssessment>,
    /// Screen of the current snapshot.
    pub current: Recommendation,
    /// Screen of the previous snapshot, same strategy.
    pub previous: Recommendation,
    /// Buy/sell/hold partition.
    pub diff: SnapshotDiff,
}

/// Screens both snapshots with the strategy chosen for `current` and diffs
/// the results.
///
/// An empty `current` cannot be assessed. The strategy then comes from
/// `strategy` or the previous snapshot's assessment, and every previous pick
/// is reported as a sell.
///
/// # Errors
///
/// Returns `ScreenError::NoEligibleBonds` when both snapshots are empty and
/// no strategy is given.
pub fn diff_snapshots(
    current: &Snapshot,
    previous: &Snapshot,
    config: &ScreenConfig,
    strategy: Option<Strategy>,
) -> ScreenResult<DiffOutcome> {
    let (assessment, strategy) = if current.is_empty() {
        warn!(as_of = %current.as_of(), "current snapshot is empty");
        let strategy = match strategy {
            Some(strategy) => strategy,
            None => assess(previous, &config.sizing)?.strategy,
        };
        (None, strategy)
    } else {
        let assessment = assess(current, &config.sizing)?;
        let strategy = strategy.unwrap_or(assessment.strategy);
        (Some(assessment), strategy)
    };

    let current_rec = select(current, strategy, &config.selector);
    let previous_rec = select(previous, strategy, &config.selector);
    let diff = diff(&current_rec, &previous_rec);

    Ok(DiffOutcome {
        assessment,
        current: current_rec,
        previous: previous_rec,
        diff,
    })
}
