//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use cbscreen_screen::scoring::{RiskPreference, ScoringStrategy};
use cbscreen_screen::selector::Strategy;

use crate::commands::{
    ConfigArgs, DiffArgs, JudgeArgs, LatestArgs, PortfolioArgs, ScoreArgs, ScreenArgs,
    SignalsArgs,
};

/// cbscreen - Convertible bond screening from CSV snapshots
#[derive(Parser)]
#[command(name = "cbscreen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Configuration file (.toml or .json)
    #[arg(short, long, env = "CBSCREEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD). Defaults to the snapshot's file date, then today.
    #[arg(short, long, global = true)]
    pub date: Option<String>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Screen a snapshot and print the recommendation
    Screen(ScreenArgs),

    /// Judge the market: valuation summary, position size and strategy
    Judge(JudgeArgs),

    /// Compare the screens of two snapshots (buy/sell/hold)
    Diff(DiffArgs),

    /// Compare the two newest snapshots in a directory
    Latest(LatestArgs),

    /// Score bonds under a strategy and risk preference
    Score(ScoreArgs),

    /// Build a target portfolio and optional rebalancing trades
    Portfolio(PortfolioArgs),

    /// Premium-rate percentile signals from snapshot history
    Signals(SignalsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Screening strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyArg {
    /// Pick from the mean double-low score
    #[default]
    Auto,
    /// Premium cap, shortlist by premium, rank by double-low
    LowPremium,
    /// Double-low caps, shortlist by double-low, rank by premium
    DoubleLow,
}

impl StrategyArg {
    /// The forced strategy, or `None` for automatic selection.
    pub fn resolve(self) -> Option<Strategy> {
        match self {
            Self::Auto => None,
            Self::LowPremium => Some(Strategy::LowPremiumThenDoubleLow),
            Self::DoubleLow => Some(Strategy::DoubleLowThenLowPremium),
        }
    }
}

/// Scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScoringArg {
    /// Low price plus premium
    DoubleLow,
    /// Low premium rate
    LowPremium,
    /// Price close to conversion value
    ParValue,
}

impl From<ScoringArg> for ScoringStrategy {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::DoubleLow => Self::DoubleLow,
            ScoringArg::LowPremium => Self::LowPremium,
            ScoringArg::ParValue => Self::ParValue,
        }
    }
}

/// Risk preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RiskArg {
    /// Tighter filters
    Conservative,
    /// Baseline
    #[default]
    Moderate,
    /// Looser filters
    Aggressive,
}

impl From<RiskArg> for RiskPreference {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::Conservative => Self::Conservative,
            RiskArg::Moderate => Self::Moderate,
            RiskArg::Aggressive => Self::Aggressive,
        }
    }
}
