//! Diff command implementation.
//!
//! Screens two snapshots with the strategy chosen for the newer one and
//! prints what to buy, sell and keep.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cbscreen_ext_file::load_file;
use cbscreen_screen::pipeline::{diff_snapshots, DiffOutcome};

use crate::cli::{OutputFormat, StrategyArg};
use crate::commands::{unlisted_codes, Context};
use crate::output::{
    assessment_rows, diff_rows, print_header, print_info, print_output, print_single,
    print_warning,
};

/// Arguments for the diff command.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Current snapshot CSV
    pub current: PathBuf,

    /// Previous snapshot CSV
    pub previous: PathBuf,

    /// Base-info CSV; bonds with an empty listing date are excluded
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,

    /// Screening strategy (auto picks from the current mean double-low score)
    #[arg(short, long, value_enum, default_value = "auto")]
    pub strategy: StrategyArg,
}

/// Execute the diff command.
pub fn execute(args: DiffArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let unlisted = unlisted_codes(args.base_info.as_deref())?;
    let current = load_file(
        &args.current,
        ctx.reference_date(&args.current),
        &unlisted,
        &ctx.config,
    )?;
    let previous = load_file(
        &args.previous,
        ctx.prior_reference_date(&args.previous),
        &unlisted,
        &ctx.config,
    )?;

    let outcome = diff_snapshots(
        &current.snapshot,
        &previous.snapshot,
        &ctx.config,
        args.strategy.resolve(),
    )?;
    print_diff(&outcome, format)
}

/// Prints a diff outcome in the requested format.
pub fn print_diff(outcome: &DiffOutcome, format: OutputFormat) -> Result<()> {
    let rows = diff_rows(&outcome.diff);

    match format {
        OutputFormat::Table => {
            print_header("Market");
            match &outcome.assessment {
                Some(assessment) => print_output(&assessment_rows(assessment), format)?,
                None => print_warning(&format!(
                    "No eligible bonds on {}; selling every previous pick",
                    outcome.current.as_of
                )),
            }

            print_header(&format!(
                "Changes: {} vs {} ({})",
                outcome.current.as_of, outcome.previous.as_of, outcome.current.strategy
            ));
            if outcome.diff.is_unchanged() {
                print_info("Recommendation unchanged");
            }
            print_output(&rows, format)?;
            print_info(&format!(
                "buy {}, sell {}, hold {}",
                outcome.diff.buy.len(),
                outcome.diff.sell.len(),
                outcome.diff.hold.len()
            ));
        }
        OutputFormat::Json => print_single(outcome)?,
        OutputFormat::Csv => print_output(&rows, format)?,
    }

    Ok(())
}
