//! Score command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cbscreen_screen::scoring::{analyze, RiskPreference, ScoringStrategy};

use crate::cli::{OutputFormat, RiskArg, ScoringArg};
use crate::commands::{validate_count, Context};
use crate::output::{print_header, print_output, ScoredRow};

/// Arguments for the score command.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Snapshot CSV export
    pub file: PathBuf,

    /// Scoring strategy
    #[arg(short, long, value_enum)]
    pub strategy: ScoringArg,

    /// Risk preference; scales the maturity and premium filters
    #[arg(short, long, value_enum, default_value = "moderate")]
    pub risk: RiskArg,

    /// Base-info CSV; bonds with an empty listing date are excluded
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,

    /// Maximum number of results (overrides scoring.max_results)
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

/// Execute the score command.
pub fn execute(args: ScoreArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut scoring = ctx.config.scoring.clone();
    if let Some(top) = args.top {
        scoring.max_results = validate_count("--top", top)?;
    }

    let reference_date = ctx.reference_date(&args.file);
    let loaded = ctx.load(&args.file, reference_date, args.base_info.as_deref())?;

    let strategy = ScoringStrategy::from(args.strategy);
    let risk = RiskPreference::from(args.risk);
    let rows: Vec<ScoredRow> = analyze(&loaded.snapshot, strategy, risk, &scoring)
        .iter()
        .enumerate()
        .map(|(i, scored)| ScoredRow::new(i + 1, scored))
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("{strategy} picks ({risk})"));
    }
    print_output(&rows, format)
}
