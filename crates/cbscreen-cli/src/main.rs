//! cbscreen CLI - Convertible bond screening from daily CSV exports.
//!
//! # Usage
//!
//! ```bash
//! # Screen one snapshot, excluding bonds that are not listed yet
//! cbscreen screen data/conv_20250903.csv --base-info data/base_info.csv
//!
//! # Market valuation and position size
//! cbscreen judge data/conv_20250903.csv
//!
//! # What changed since the previous trading day
//! cbscreen latest data/
//!
//! # Target portfolio for a conservative account
//! cbscreen portfolio data/conv_20250903.csv --risk conservative
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let format = cli.format;
    let ctx = Context::new(cli.config.as_deref(), cli.date.as_deref())?;

    match cli.command {
        Commands::Screen(args) => commands::screen::execute(args, &ctx, format)?,
        Commands::Judge(args) => commands::judge::execute(args, &ctx, format)?,
        Commands::Diff(args) => commands::diff::execute(args, &ctx, format)?,
        Commands::Latest(args) => commands::latest::execute(args, &ctx, format)?,
        Commands::Score(args) => commands::score::execute(args, &ctx, format)?,
        Commands::Portfolio(args) => commands::portfolio::execute(args, &ctx, format)?,
        Commands::Signals(args) => commands::signals::execute(args, &ctx, format)?,
        Commands::Config(args) => commands::config::execute(args, &ctx, format)?,
    }

    Ok(())
}

/// Logs go to stderr so table, JSON and CSV output stay clean on stdout.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,cbscreen=info",
        1 => "info,cbscreen=debug",
        _ => "debug,cbscreen=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
