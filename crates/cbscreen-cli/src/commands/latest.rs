//! Latest command implementation.
//!
//! Resolves the two newest `conv_YYYYMMDD.csv` snapshots in a directory and
//! diffs their screens.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use cbscreen_ext_file::SnapshotDirectory;
use cbscreen_screen::pipeline::diff_snapshots;

use crate::cli::{OutputFormat, StrategyArg};
use crate::commands::diff::print_diff;
use crate::commands::{unlisted_codes, Context};
use crate::error::CliError;

/// Base-info file picked up from the snapshot directory when present.
const DEFAULT_BASE_INFO: &str = "base_info.csv";

/// Arguments for the latest command.
#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Directory of conv_YYYYMMDD.csv snapshots
    pub dir: PathBuf,

    /// Base-info CSV (default: base_info.csv in the directory, if present)
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,

    /// Screening strategy (auto picks from the current mean double-low score)
    #[arg(short, long, value_enum, default_value = "auto")]
    pub strategy: StrategyArg,
}

/// Execute the latest command.
///
/// With `--date`, the newest snapshot on or before that date counts as
/// current.
pub fn execute(args: LatestArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let snapshots = SnapshotDirectory::scan(&args.dir)?;

    let current = match ctx.date() {
        Some(date) => snapshots.on_or_before(date)?,
        None => snapshots.latest()?,
    };
    let previous = snapshots
        .before(current.date)
        .ok_or_else(|| CliError::NoPreviousSnapshot(args.dir.display().to_string()))?;
    info!(current = %current.date, previous = %previous.date, "comparing snapshots");

    let base_info = args.base_info.clone().or_else(|| {
        let candidate = args.dir.join(DEFAULT_BASE_INFO);
        candidate.exists().then_some(candidate)
    });
    let unlisted = unlisted_codes(base_info.as_deref())?;

    let current = current.load(&unlisted, &ctx.config)?;
    let previous = previous.load(&unlisted, &ctx.config)?;

    let outcome = diff_snapshots(
        &current.snapshot,
        &previous.snapshot,
        &ctx.config,
        args.strategy.resolve(),
    )?;
    print_diff(&outcome, format)
}
