//! Screen command implementation.
//!
//! Loads one snapshot, judges the market and prints the recommended bonds,
//! or with `--consensus` the bonds every screen picks.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cbscreen_config::ScreenConfig;
use cbscreen_core::Snapshot;
use cbscreen_screen::pipeline::run_screen;
use cbscreen_screen::selector::consensus;

use crate::cli::{OutputFormat, StrategyArg};
use crate::commands::{validate_count, Context};
use crate::output::{assessment_rows, print_header, print_output, print_single, BondRow};

/// Arguments for the screen command.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Snapshot CSV export
    pub file: PathBuf,

    /// Base-info CSV; bonds with an empty listing date are excluded
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,

    /// Screening strategy (auto picks from the mean double-low score)
    #[arg(short, long, value_enum, default_value = "auto")]
    pub strategy: StrategyArg,

    /// Number of bonds to recommend (overrides selector.top_n)
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Only list bonds picked by every screen
    #[arg(long, conflicts_with = "strategy")]
    pub consensus: bool,
}

/// Execute the screen command.
pub fn execute(args: ScreenArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(top) = args.top {
        config.selector.top_n = validate_count("--top", top)?;
    }

    let reference_date = ctx.reference_date(&args.file);
    let loaded = ctx.load(&args.file, reference_date, args.base_info.as_deref())?;
    if args.consensus {
        return print_consensus(&loaded.snapshot, &config, format);
    }
    let outcome = run_screen(&loaded.snapshot, &config, args.strategy.resolve())?;

    let rows: Vec<BondRow> = outcome.recommendation.bonds.iter().map(BondRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_header("Market");
            print_output(&assessment_rows(&outcome.assessment), format)?;

            let strategy = outcome.recommendation.strategy;
            print_header(&format!(
                "Recommendation: {} ({}), {} of {} eligible",
                strategy.label(),
                strategy,
                rows.len(),
                loaded.snapshot.len()
            ));
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_single(&outcome)?,
        OutputFormat::Csv => print_output(&rows, format)?,
    }

    Ok(())
}

fn print_consensus(
    snapshot: &Snapshot,
    config: &ScreenConfig,
    format: OutputFormat,
) -> Result<()> {
    let agreed = consensus(snapshot, &config.selector);
    let rows: Vec<BondRow> = agreed.bonds.iter().map(BondRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_header(&format!(
                "Consensus: {} of {} eligible",
                rows.len(),
                snapshot.len()
            ));
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_single(&agreed)?,
        OutputFormat::Csv => print_output(&rows, format)?,
    }
    Ok(())
}
