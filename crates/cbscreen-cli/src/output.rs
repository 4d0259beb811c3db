//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use cbscreen_core::{BondRecord, Date};
use cbscreen_screen::diff::{HeldBond, SnapshotDiff};
use cbscreen_screen::portfolio::{PortfolioWeights, RebalanceAction};
use cbscreen_screen::scoring::ScoredBond;
use cbscreen_screen::signals::SignalReading;
use cbscreen_screen::sizing::MarketAssessment;

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints a single result as JSON.
pub fn print_single<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

fn fmt2(value: &f64) -> String {
    format!("{:.2}", value)
}

fn fmt_percent(value: &f64) -> String {
    format!("{:.2}%", value)
}

fn fmt_weight(value: &f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn fmt_optional(value: &Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a float with fixed precision.
    pub fn from_f64(key: impl Into<String>, value: f64, precision: usize) -> Self {
        Self {
            key: key.into(),
            value: format!("{:.prec$}", value, prec = precision),
        }
    }
}

/// Key-value rows describing a market assessment.
pub fn assessment_rows(assessment: &MarketAssessment) -> Vec<KeyValue> {
    let summary = &assessment.summary;
    vec![
        KeyValue::new("Date", assessment.as_of.to_string()),
        KeyValue::new("Eligible Bonds", summary.count.to_string()),
        KeyValue::from_f64("Mean Premium %", summary.mean_premium_rate, 2),
        KeyValue::from_f64("Median Premium %", summary.median_premium_rate, 2),
        KeyValue::from_f64("Mean Double-Low", summary.mean_double_low, 2),
        KeyValue::from_f64("Median Double-Low", summary.median_double_low, 2),
        KeyValue::new(
            "Position Size",
            format!("{} ({})", assessment.bucket.label(), assessment.bucket),
        ),
        KeyValue::new(
            "Strategy",
            format!("{} ({})", assessment.strategy.label(), assessment.strategy),
        ),
    ]
}

/// One bond in a recommendation.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BondRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price", display_with = "fmt2")]
    pub price: f64,
    #[tabled(rename = "Premium", display_with = "fmt_percent")]
    pub premium_rate: f64,
    #[tabled(rename = "Double-Low", display_with = "fmt2")]
    pub double_low: f64,
    #[tabled(rename = "Conv. Value", display_with = "fmt2")]
    pub conversion_value: f64,
    #[tabled(rename = "Issuer")]
    pub issuer_name: String,
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "Size", display_with = "fmt_optional")]
    pub remaining_size: Option<f64>,
    #[tabled(rename = "Maturity")]
    pub maturity_date: Date,
}

impl From<&BondRecord> for BondRow {
    fn from(bond: &BondRecord) -> Self {
        Self {
            code: bond.code.clone(),
            name: bond.name.clone(),
            price: bond.price,
            premium_rate: bond.premium_rate,
            double_low: bond.double_low_score(),
            conversion_value: bond.conversion_value(),
            issuer_name: bond.issuer_name.clone(),
            rating: bond.credit_rating.notation().to_string(),
            remaining_size: bond.remaining_size,
            maturity_date: bond.maturity_date,
        }
    }
}

/// One line of a buy/sell/hold comparison.
///
/// `_old` columns are only filled for held bonds.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DiffRow {
    #[tabled(rename = "Action")]
    pub action: String,
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price", display_with = "fmt2")]
    pub price: f64,
    #[tabled(rename = "Premium", display_with = "fmt_percent")]
    pub premium_rate: f64,
    #[tabled(rename = "Double-Low", display_with = "fmt2")]
    pub double_low: f64,
    #[tabled(rename = "Price Old", display_with = "fmt_optional")]
    pub price_old: Option<f64>,
    #[tabled(rename = "Premium Old", display_with = "fmt_optional")]
    pub premium_rate_old: Option<f64>,
    #[tabled(rename = "Double-Low Old", display_with = "fmt_optional")]
    pub double_low_old: Option<f64>,
}

impl DiffRow {
    fn single(action: &str, bond: &BondRecord) -> Self {
        Self {
            action: action.to_string(),
            code: bond.code.clone(),
            name: bond.name.clone(),
            price: bond.price,
            premium_rate: bond.premium_rate,
            double_low: bond.double_low_score(),
            price_old: None,
            premium_rate_old: None,
            double_low_old: None,
        }
    }

    fn held(held: &HeldBond) -> Self {
        Self {
            price_old: Some(held.previous.price),
            premium_rate_old: Some(held.previous.premium_rate),
            double_low_old: Some(held.previous.double_low_score()),
            ..Self::single("hold", &held.current)
        }
    }
}

/// Flattens a diff into rows: buys, then sells, then holds.
pub fn diff_rows(diff: &SnapshotDiff) -> Vec<DiffRow> {
    diff.buy
        .iter()
        .map(|b| DiffRow::single("buy", b))
        .chain(diff.sell.iter().map(|b| DiffRow::single("sell", b)))
        .chain(diff.hold.iter().map(DiffRow::held))
        .collect()
}

/// One scored bond.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ScoredRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price", display_with = "fmt2")]
    pub price: f64,
    #[tabled(rename = "Premium", display_with = "fmt_percent")]
    pub premium_rate: f64,
    #[tabled(rename = "Score", display_with = "fmt2")]
    pub score: f64,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

impl ScoredRow {
    pub fn new(rank: usize, scored: &ScoredBond) -> Self {
        Self {
            rank,
            code: scored.bond.code.clone(),
            name: scored.bond.name.clone(),
            price: scored.bond.price,
            premium_rate: scored.bond.premium_rate,
            score: scored.score,
            reason: scored.reason.clone(),
        }
    }
}

/// One position of a target portfolio.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct WeightRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Weight", display_with = "fmt_weight")]
    pub weight: f64,
}

/// Rows for every position, in code order.
pub fn weight_rows(weights: &PortfolioWeights) -> Vec<WeightRow> {
    weights
        .iter()
        .map(|(code, weight)| WeightRow {
            code: code.to_string(),
            weight,
        })
        .collect()
}

/// One rebalancing trade.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TradeRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Side")]
    pub side: String,
    #[tabled(rename = "Current", display_with = "fmt_weight")]
    pub current_weight: f64,
    #[tabled(rename = "Target", display_with = "fmt_weight")]
    pub target_weight: f64,
    #[tabled(rename = "Amount", display_with = "fmt_weight")]
    pub amount: f64,
}

impl From<&RebalanceAction> for TradeRow {
    fn from(action: &RebalanceAction) -> Self {
        Self {
            code: action.code.clone(),
            side: action.side.to_string(),
            current_weight: action.current_weight,
            target_weight: action.target_weight,
            amount: action.amount,
        }
    }
}

/// One premium-rate signal.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SignalRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Signal")]
    pub signal: String,
    #[tabled(rename = "Date")]
    pub date: Date,
    #[tabled(rename = "Premium", display_with = "fmt_percent")]
    pub premium_rate: f64,
    #[tabled(rename = "Percentile", display_with = "fmt_weight")]
    pub percentile: f64,
}

impl From<&SignalReading> for SignalRow {
    fn from(reading: &SignalReading) -> Self {
        Self {
            code: reading.code.clone(),
            signal: reading.signal.to_string(),
            date: reading.date,
            premium_rate: reading.premium_rate,
            percentile: reading.percentile,
        }
    }
}
