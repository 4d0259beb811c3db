//! Signals command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cbscreen_ext_file::{load_premium_history, SnapshotDirectory};
use cbscreen_screen::signals::trade_signals;

use crate::cli::OutputFormat;
use crate::commands::{validate_count, Context};
use crate::output::{print_header, print_info, print_output, print_single, SignalRow};

/// Arguments for the signals command.
#[derive(Args, Debug)]
pub struct SignalsArgs {
    /// Directory of conv_YYYYMMDD.csv snapshots
    pub dir: PathBuf,

    /// Observations in the percentile window (overrides signals.lookback)
    #[arg(short, long)]
    pub lookback: Option<usize>,

    /// Also list bonds with no signal
    #[arg(short, long)]
    pub all: bool,
}

/// Execute the signals command.
pub fn execute(args: SignalsArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut config = ctx.config.signals.clone();
    if let Some(lookback) = args.lookback {
        config.lookback = validate_count("--lookback", lookback)?;
    }

    let snapshots = SnapshotDirectory::scan(&args.dir)?;
    let histories = load_premium_history(&snapshots, &ctx.config.columns)?;
    let signals = trade_signals(&histories, &config);

    let buy: Vec<SignalRow> = signals.buy.iter().map(SignalRow::from).collect();
    let sell: Vec<SignalRow> = signals.sell.iter().map(SignalRow::from).collect();
    let hold: Vec<SignalRow> = signals.hold.iter().map(SignalRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_info(&format!(
                "{} snapshots, {} bonds with at least {} observations",
                snapshots.len(),
                signals.len(),
                config.lookback
            ));
            print_header("Buy (premium near the low of its range)");
            print_output(&buy, format)?;
            print_header("Sell (premium near the high of its range)");
            print_output(&sell, format)?;
            if args.all {
                print_header("Hold");
                print_output(&hold, format)?;
            }
        }
        OutputFormat::Json => print_single(&signals)?,
        OutputFormat::Csv => {
            let mut rows = buy;
            rows.extend(sell);
            if args.all {
                rows.extend(hold);
            }
            print_output(&rows, format)?;
        }
    }

    Ok(())
}
