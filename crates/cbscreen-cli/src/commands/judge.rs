//! Judge command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cbscreen_screen::sizing::assess;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{assessment_rows, print_header, print_output, print_single};

/// Arguments for the judge command.
#[derive(Args, Debug)]
pub struct JudgeArgs {
    /// Snapshot CSV export
    pub file: PathBuf,

    /// Base-info CSV; bonds with an empty listing date are excluded
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,
}

/// Execute the judge command.
pub fn execute(args: JudgeArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let reference_date = ctx.reference_date(&args.file);
    let loaded = ctx.load(&args.file, reference_date, args.base_info.as_deref())?;
    let assessment = assess(&loaded.snapshot, &ctx.config.sizing)?;

    match format {
        OutputFormat::Table => {
            print_header("Market Valuation");
            print_output(&assessment_rows(&assessment), format)?;
        }
        OutputFormat::Json => print_single(&assessment)?,
        OutputFormat::Csv => print_output(&assessment_rows(&assessment), format)?,
    }

    Ok(())
}
