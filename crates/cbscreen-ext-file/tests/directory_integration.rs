//! Integration test: resolve the two newest snapshots in a directory, load
//! them with a base-info exclusion list and diff their screens.

use std::path::Path;

use cbscreen_config::ScreenConfig;
use cbscreen_core::Date;
use cbscreen_ext_file::{
    load_file, load_premium_history, load_unlisted, FileError, SnapshotDirectory,
};
use cbscreen_screen::pipeline::diff_snapshots;
use cbscreen_screen::signals::trade_signals;

const HEADER: &str = "代码,转债名称,现价,正股名称,正股价,转股价,转股溢价率,债券评级,到期时间,剩余规模";

fn write_snapshot(dir: &Path, name: &str, rows: &[&str]) {
    let mut content = format!("{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(dir.join(name), content).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(
        dir.path(),
        "conv_20250902.csv",
        &[
            "113001,甲转债,108.0,甲科技,9.70,10.00,11.3%,AA+,2029-03-15,5.20",
            "113002,乙转债,100.5,乙制造,8.50,10.00,18.2%,AA,2028-07-01,2.10",
            "113005,戊转债,103.0,戊医药,9.50,10.00,8.4%,AA,2028-03-01,1.80",
        ],
    );
    write_snapshot(
        dir.path(),
        "conv_20250903.csv",
        &[
            "113001,甲转债,108.5,甲科技,9.80,10.00,10.7%,AA+,2029-03-15,5.20",
            "113002,乙转债,101.2,乙制造,8.50,10.00,19.1%,AA,2028-07-01,2.10",
            "113007,庚转债,104.0,庚电子,9.00,10.00,15.6%,AA,2028-12-31,4.40",
            "113009,壬转债,100.0,壬材料,8.00,10.00,25.0%,AA,2031-01-01,6.00",
        ],
    );
    std::fs::write(
        dir.path().join("base_info.csv"),
        "债券代码,债券简称,上市日期\n113001,甲转债,2023-04-01\n113009,壬转债,\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_latest_against_previous() {
    let dir = fixture();
    let config = ScreenConfig::default();
    let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
    assert_eq!(snapshots.len(), 2);

    let unlisted = load_unlisted(dir.path().join("base_info.csv")).unwrap();
    let latest = snapshots.latest().unwrap();
    let previous = snapshots.previous().unwrap();
    assert_eq!(latest.date, Date::from_ymd(2025, 9, 3).unwrap());

    let current = latest.load(&unlisted, &config).unwrap();
    let prior = previous.load(&unlisted, &config).unwrap();
    assert_eq!(current.report.dropped_unlisted, 1);
    assert_eq!(current.snapshot.len(), 3);

    let outcome = diff_snapshots(&current.snapshot, &prior.snapshot, &config, None).unwrap();
    let buys: Vec<&str> = outcome.diff.buy.iter().map(|b| b.code.as_str()).collect();
    let sells: Vec<&str> = outcome.diff.sell.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(buys, vec!["113007"]);
    assert_eq!(sells, vec!["113005"]);
    assert_eq!(outcome.diff.hold.len(), 2);
}

#[test]
fn test_missing_required_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("conv_20250903.csv"), "代码,现价\n113001,100\n").unwrap();
    let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
    let err = snapshots
        .latest()
        .unwrap()
        .load(&Default::default(), &ScreenConfig::default())
        .unwrap_err();
    assert!(matches!(err, FileError::Screen(_)));
}

#[test]
fn test_short_row_is_dropped_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conv_20250903.csv");
    std::fs::write(
        &path,
        "代码,现价,正股价,转股价,转股溢价率,到期时间,正股名称\n\
         113001,108.5,9.80,10.00,10.7%,2029-03-15,甲科技\n\
         113002,101.2,8.50,10.00,19.1%,2028-07-01\n",
    )
    .unwrap();

    let loaded = load_file(
        &path,
        Date::from_ymd(2025, 9, 3).unwrap(),
        &Default::default(),
        &ScreenConfig::default(),
    )
    .unwrap();
    assert_eq!(loaded.snapshot.codes(), vec!["113001"]);
    assert_eq!(loaded.report.total_rows, 2);
    assert_eq!(loaded.report.dropped_unparseable, 1);
}

#[test]
fn test_history_feeds_signals() {
    let dir = fixture();
    let snapshots = SnapshotDirectory::scan(dir.path()).unwrap();
    let histories = load_premium_history(&snapshots, &ScreenConfig::default().columns).unwrap();
    assert_eq!(histories.len(), 5);

    let mut config = ScreenConfig::default().signals;
    config.lookback = 2;
    let signals = trade_signals(&histories, &config);

    // 113001 premium fell (11.3 -> 10.7): lowest in window, rank 1 of 2.
    // 113002 premium rose (18.2 -> 19.1): highest, rank 2 of 2.
    assert_eq!(signals.len(), 2);
    assert_eq!(signals.sell[0].code, "113002");
    assert_eq!(signals.hold[0].code, "113001");
}
