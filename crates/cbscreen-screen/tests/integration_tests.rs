//! Integration tests for cbscreen-screen.
//!
//! These run the full pipeline from a raw export table, the way the CLI
//! does, on a small market modelled on a Jisilu export.

use std::collections::HashSet;

use approx::assert_relative_eq;
use cbscreen_config::{ColumnMap, ScreenConfig};
use cbscreen_core::{CreditRating, Date, RawTable};
use cbscreen_screen::prelude::*;

// =============================================================================
// TEST FIXTURES
// =============================================================================

const HEADERS: [&str; 12] = [
    "代码",
    "转债名称",
    "现价",
    "正股名称",
    "正股价",
    "转股价",
    "转股价值",
    "转股溢价率",
    "债券评级",
    "到期时间",
    "剩余规模",
    "双低",
];

#[allow(clippy::too_many_arguments)]
fn row(
    code: &str,
    name: &str,
    price: &str,
    issuer: &str,
    stock: &str,
    convert: &str,
    premium: &str,
    rating: &str,
    maturity: &str,
    size: &str,
) -> Vec<String> {
    // 转股价值 and 双低 are upstream-computed and ignored by the loader.
    [
        code, name, price, issuer, stock, convert, "0", premium, rating, maturity, size, "0",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

#[rustfmt::skip]
fn market_table() -> RawTable {
    let rows = vec![
        row("113001", "甲转债", "108.5", "甲科技", "9.80", "10.00", "10.7%", "AA+", "2029-03-15", "5.20"),
        row("113002", "乙转债", "101.2", "乙制造", "8.50", "10.00", "19.1%", "AA", "2028-07-01", "2.10"),
        row("113003", "丙转债", "125.0", "丙能源", "12.40", "10.00", "0.8%", "AAA", "2030-11-20", "12.00"),
        row("113004", "丁转债", "99.0", "ST丁", "6.00", "10.00", "65.0%", "A", "2027-05-05", "1.00"),
        row("113005", "戊转债", "118.0", "戊医药", "11.00", "10.00", "7.3%", "AA-", "2026-03-01", "0.80"),
        row("113006", "己转债", "-", "己化工", "7.00", "10.00", "45.0%", "AA", "2029-01-01", "3.00"),
        row("113007", "庚转债", "104.0", "庚电子", "9.00", "10.00", "15.6%", "AA", "2028-12-31", "4.40"),
        row("113008", "辛转债", "100.0", "辛新材", "9.20", "10.00", "11.1%", "AA", "2029-06-30", "1.50"),
        row("113001", "甲转债", "108.5", "甲科技", "9.80", "10.00", "10.7%", "AA+", "2029-03-15", "5.20"),
    ];
    RawTable::new(HEADERS.iter().map(|s| (*s).to_string()).collect(), rows)
}

fn reference_date() -> Date {
    Date::from_ymd(2025, 9, 3).unwrap()
}

fn load(unlisted: &HashSet<String>) -> LoadedSnapshot {
    let config = ScreenConfig::default();
    load_snapshot(
        &market_table(),
        &ColumnMap::default(),
        reference_date(),
        unlisted,
        &config.loader,
    )
    .unwrap()
}

// =============================================================================
// LOADER
// =============================================================================

#[test]
fn test_load_market() {
    let unlisted: HashSet<String> = ["113008".to_string()].into_iter().collect();
    let loaded = load(&unlisted);

    assert_eq!(loaded.snapshot.codes(), vec!["113001", "113002", "113003", "113007"]);
    assert_eq!(loaded.report.total_rows, 9);
    assert_eq!(loaded.report.dropped_unparseable, 1);
    assert_eq!(loaded.report.dropped_near_maturity, 1);
    assert_eq!(loaded.report.dropped_distressed, 1);
    assert_eq!(loaded.report.dropped_unlisted, 1);
    assert_eq!(loaded.report.dropped_duplicate, 1);

    let first = loaded.snapshot.get("113001").unwrap();
    assert_eq!(first.name, "甲转债");
    assert_eq!(first.credit_rating, CreditRating::AAPlus);
    assert_eq!(first.remaining_size, Some(5.2));
    assert_relative_eq!(first.double_low_score(), 119.2, epsilon = 1e-9);
}

#[test]
fn test_snapshot_invariants() {
    let loaded = load(&HashSet::new());
    let cutoff = reference_date().add_days(365);
    for bond in &loaded.snapshot {
        assert!(bond.maturity_date > cutoff);
        assert!(!bond.issuer_name.contains("ST"));
        assert!(!bond.issuer_name.contains('*'));
    }
}

// =============================================================================
// SCREEN AND SIZING
// =============================================================================

#[test]
fn test_screen_market() {
    let loaded = load(&HashSet::new());
    let config = ScreenConfig::default();
    let outcome = run_screen(&loaded.snapshot, &config, None).unwrap();

    // Double-lows: 119.2, 120.3, 125.8, 119.6, 111.1 -> mean 119.2
    assert_relative_eq!(outcome.assessment.mean_double_low(), 119.2, epsilon = 1e-9);
    assert_eq!(outcome.assessment.bucket, PositionSizeBucket::FullPosition);
    assert_eq!(outcome.assessment.strategy, Strategy::LowPremiumThenDoubleLow);

    // All five pass the premium cap; ordered by conversion value.
    assert_eq!(
        outcome.recommendation.codes(),
        vec!["113003", "113001", "113008", "113007", "113002"]
    );
}

#[test]
fn test_bond_leaning_screen() {
    let loaded = load(&HashSet::new());
    let config = ScreenConfig::default();
    let rec = select(&loaded.snapshot, Strategy::DoubleLowThenLowPremium, &config.selector);

    // 113003 fails the price cap; the rest are ranked by premium then
    // re-ordered by conversion value.
    assert_eq!(rec.criterion, RankingCriterion::LowPremium);
    assert_eq!(rec.codes(), vec!["113001", "113008", "113007", "113002"]);
}

#[test]
fn test_top_n_bound() {
    let loaded = load(&HashSet::new());
    let config = ScreenConfig::default();
    let selector = config.selector.clone().with_top_n(2);
    let rec = select(&loaded.snapshot, Strategy::LowPremiumThenDoubleLow, &selector);
    // Two lowest double-lows: 113008 (111.1), 113001 (119.2)
    assert_eq!(rec.codes(), vec!["113001", "113008"]);
}

// =============================================================================
// DIFF
// =============================================================================

#[test]
fn test_diff_worked_example() {
    let maturity = Date::from_ymd(2030, 1, 1).unwrap();
    let bond = |code: &str, price: f64| {
        cbscreen_core::BondRecord::new(code, price, 10.0, 10.0, 5.0, maturity, "X")
    };
    let current = vec![bond("A", 120.0), bond("B", 130.0)];
    let previous = vec![bond("B", 125.0), bond("C", 110.0)];

    let d = diff_records(&current, &previous);
    assert_eq!(d.buy.iter().map(|b| b.code.as_str()).collect::<Vec<_>>(), vec!["A"]);
    assert_eq!(d.sell.iter().map(|b| b.code.as_str()).collect::<Vec<_>>(), vec!["C"]);
    assert_eq!(d.hold.iter().map(HeldBond::code).collect::<Vec<_>>(), vec!["B"]);
}

#[test]
fn test_day_over_day() {
    let today = load(&HashSet::new());
    let unlisted: HashSet<String> = ["113002".to_string()].into_iter().collect();
    let mut yesterday = load(&unlisted).snapshot;
    yesterday = yesterday.filter(|b| b.code != "113007");

    let outcome =
        diff_snapshots(&today.snapshot, &yesterday, &ScreenConfig::default(), None).unwrap();
    let buys: Vec<&str> = outcome.diff.buy.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(buys, vec!["113007", "113002"]);
    assert!(outcome.diff.sell.is_empty());
    assert_eq!(outcome.diff.hold.len(), 3);
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[test]
fn test_portfolio_and_rebalance() {
    let loaded = load(&HashSet::new());
    let config = ScreenConfig::default();
    let target = build_portfolio(
        &loaded.snapshot,
        RiskPreference::Moderate,
        &config.scoring,
        &config.portfolio,
    );
    assert!(target.total() <= 1.0 + 1e-9);
    assert!(!target.is_empty());

    let threshold = config.portfolio.rebalance_threshold;
    let actions = rebalance(&PortfolioWeights::new(), &target, threshold);
    assert!(actions.iter().all(|a| a.side == TradeSide::Buy));
}
