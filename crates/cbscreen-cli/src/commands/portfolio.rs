//! Portfolio command implementation.
//!
//! Builds a target portfolio from the three scoring strategies and, given
//! current holdings, the trades needed to reach it.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use cbscreen_screen::portfolio::{build_portfolio, rebalance, PortfolioWeights, RebalanceAction};
use cbscreen_screen::scoring::RiskPreference;

use crate::cli::{OutputFormat, RiskArg};
use crate::commands::{validate_count, Context};
use crate::output::{print_header, print_info, print_output, print_single, weight_rows, TradeRow};

/// Arguments for the portfolio command.
#[derive(Args, Debug)]
pub struct PortfolioArgs {
    /// Snapshot CSV export
    pub file: PathBuf,

    /// Risk preference; picks the strategy mix
    #[arg(short, long, value_enum, default_value = "moderate")]
    pub risk: RiskArg,

    /// Bonds taken per strategy (overrides portfolio.max_bonds)
    #[arg(short, long)]
    pub max_bonds: Option<usize>,

    /// Current holdings as a JSON object of code to weight
    #[arg(long)]
    pub current: Option<PathBuf>,

    /// Base-info CSV; bonds with an empty listing date are excluded
    #[arg(short, long)]
    pub base_info: Option<PathBuf>,
}

#[derive(Serialize)]
struct PortfolioReport<'a> {
    risk: RiskPreference,
    target: &'a PortfolioWeights,
    cash: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    trades: Option<&'a [RebalanceAction]>,
}

/// Execute the portfolio command.
pub fn execute(args: PortfolioArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let mut config = ctx.config.portfolio.clone();
    if let Some(max_bonds) = args.max_bonds {
        config.max_bonds = validate_count("--max-bonds", max_bonds)?;
    }

    let reference_date = ctx.reference_date(&args.file);
    let loaded = ctx.load(&args.file, reference_date, args.base_info.as_deref())?;

    let risk = RiskPreference::from(args.risk);
    let target = build_portfolio(&loaded.snapshot, risk, &ctx.config.scoring, &config);
    let cash = (1.0 - target.total()).max(0.0);

    let trades = match &args.current {
        Some(path) => {
            let current = read_holdings(path)?;
            Some(rebalance(&current, &target, config.rebalance_threshold))
        }
        None => None,
    };

    match format {
        OutputFormat::Table => {
            print_header(&format!("Target Portfolio ({risk})"));
            print_output(&weight_rows(&target), format)?;
            print_info(&format!("cash {:.2}%", cash * 100.0));

            if let Some(trades) = &trades {
                print_header("Rebalance");
                let rows: Vec<TradeRow> = trades.iter().map(TradeRow::from).collect();
                print_output(&rows, format)?;
            }
        }
        OutputFormat::Json => {
            let report = PortfolioReport {
                risk,
                target: &target,
                cash,
                trades: trades.as_deref(),
            };
            print_single(&report)?;
        }
        OutputFormat::Csv => match &trades {
            Some(trades) => {
                let rows: Vec<TradeRow> = trades.iter().map(TradeRow::from).collect();
                print_output(&rows, format)?;
            }
            None => print_output(&weight_rows(&target), format)?,
        },
    }

    Ok(())
}

fn read_holdings(path: &Path) -> Result<PortfolioWeights> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read holdings file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| {
        format!(
            "Holdings file {} is not a JSON object of weights",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_holdings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, r#"{"113001": 0.25, "113002": 0.1}"#).unwrap();

        let holdings = read_holdings(&path).unwrap();
        assert_eq!(holdings.len(), 2);
        assert!((holdings.weight("113001") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_read_holdings_rejects_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, r#"["113001"]"#).unwrap();
        let err = read_holdings(&path).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }
}
