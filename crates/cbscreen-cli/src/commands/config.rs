//! Config command implementation.
//!
//! Shows the effective screening configuration and writes a starter file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use cbscreen_config::ScreenConfig;

use crate::cli::OutputFormat;
use crate::commands::{config_path, Context};
use crate::error::CliError;
use crate::output::{print_header, print_info, print_single, print_success};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write the default configuration as TOML
    Init(InitArgs),

    /// Show the user configuration file path
    Path,
}

/// Arguments for config init.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination (default: the user configuration file)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx, format),
        ConfigCommand::Init(init) => execute_init(init),
        ConfigCommand::Path => execute_path(),
    }
}

/// Show the effective configuration.
fn execute_show(ctx: &Context, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_header(&format!("Configuration ({})", ctx.source));
            println!("{}", ctx.config.to_toml_string()?);
        }
        OutputFormat::Json => print_single(&ctx.config)?,
        OutputFormat::Csv => {
            return Err(CliError::InvalidArgument(
                "config show supports table or json output".to_string(),
            )
            .into());
        }
    }
    Ok(())
}

/// Write the default configuration.
fn execute_init(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => config_path()?,
    };
    if path.exists() && !args.force {
        return Err(CliError::Config(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ))
        .into());
    }

    ScreenConfig::default().write_toml(&path)?;
    print_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

/// Show configuration file path.
fn execute_path() -> Result<()> {
    let path = config_path()?;
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}
