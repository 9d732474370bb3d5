//! End-to-end metric computation against an in-memory store.

use approx::assert_relative_eq;
use fremantle_data::{LineItemObservation, PriceObservation, ReitProfile, SqliteStore, StatementKind};
use fremantle_metrics::{FilterSet, MetricEngine, MetricRegistry, TickerMetricRow};

fn quarters(ticker: &str, statement: StatementKind, item: &str, start: (i32, i32), values: &[f64]) -> Vec<LineItemObservation> {
    let (year, quarter) = start;
    let first = year * 4 + quarter - 1;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let ordinal = first + i as i32;
            LineItemObservation::quarterly(ticker, statement, item, ordinal / 4, ordinal % 4 + 1, Some(*v))
        })
        .collect()
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    let mut rows = Vec::new();
    rows.extend(quarters(
        "ABC",
        StatementKind::IncomeStatement,
        "Total Revenue",
        (2022, 1),
        &[100.0, 105.0, 95.0, 110.0, 102.0, 108.0, 99.0, 115.0],
    ));
    rows.extend(quarters(
        "ABC",
        StatementKind::IncomeStatement,
        "Operating Income",
        (2023, 1),
        &[20.0, 22.0, 18.0, 21.0],
    ));
    rows.extend(quarters(
        "ABC",
        StatementKind::IncomeStatement,
        "Interest Expense",
        (2023, 1),
        &[-4.0, -4.0, -4.5, -4.5],
    ));
    rows.extend(quarters(
        "ABC",
        StatementKind::BalanceSheet,
        "Total Debt",
        (2023, 1),
        &[400.0, 410.0, 420.0, 430.0],
    ));
    rows.extend(quarters(
        "ABC",
        StatementKind::BalanceSheet,
        "Total Assets",
        (2023, 1),
        &[1000.0, 1010.0, 1000.0],
    ));
    rows.extend(quarters(
        "ABC",
        StatementKind::IndustrySpecific,
        "FFO Per Share",
        (2023, 1),
        &[0.5, 0.6, 0.4, 0.5],
    ));
    rows.extend(quarters(
        "XYZ",
        StatementKind::IncomeStatement,
        "Total Revenue",
        (2023, 2),
        &[50.0, 55.0, 60.0],
    ));
    rows.extend(quarters(
        "XYZ",
        StatementKind::IncomeStatement,
        "Operating Income",
        (2023, 2),
        &[5.0, 6.0, 7.0],
    ));
    store.put_line_items_batch(&rows).unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    store
        .put_prices_batch(&[PriceObservation::new("ABC", date, 40.0)])
        .unwrap();
    store
}

fn candidates() -> Vec<ReitProfile> {
    vec![
        ReitProfile::new("ABC").with_name("ABC Trust"),
        ReitProfile::new("XYZ").with_name("XYZ Realty"),
        ReitProfile::new("EMPTY"),
    ]
}

fn compute() -> Vec<TickerMetricRow> {
    let engine = MetricEngine::new(MetricRegistry::standard().unwrap());
    engine.compute(&seeded_store(), &candidates()).unwrap()
}

#[test]
fn test_reference_scenario() {
    let rows = compute();
    let abc = &rows[0];

    let growth = abc.metric("avg_revenue_yoy_growth").unwrap();
    assert_relative_eq!(growth, 0.0340, epsilon = 1e-4);

    let margin = abc.metric("operating_margin").unwrap();
    assert_relative_eq!(margin, 81.0 / 424.0, epsilon = 1e-12);
    assert_relative_eq!(margin, 0.1910, epsilon = 1e-4);

    let xyz = &rows[1];
    assert_eq!(xyz.metric("avg_revenue_yoy_growth"), None);
    assert_eq!(xyz.metric("operating_margin"), None);
}

#[test]
fn test_other_policies() {
    let rows = compute();
    let abc = &rows[0];

    assert_relative_eq!(abc.metric("interest_coverage_ratio").unwrap(), 81.0 / 17.0, epsilon = 1e-12);
    // Debt is reported one quarter later than assets; each side uses its own latest.
    assert_relative_eq!(abc.metric("debt_to_asset_ratio").unwrap(), 0.43, epsilon = 1e-12);
    assert_eq!(abc.metric("total_assets"), Some(1000.0));
    assert_relative_eq!(abc.metric("pffo_ratio").unwrap(), 20.0, epsilon = 1e-12);
    assert_eq!(abc.metric("pe_ratio"), None);
    assert_eq!(abc.metric("ffo_payout_ratio"), None);
    assert_eq!(abc.metric("payout_ratio"), None);
    assert_eq!(abc.latest_price, Some(40.0));
}

#[test]
fn test_candidates_without_data_are_kept() {
    let rows = compute();
    let tickers: Vec<_> = rows.iter().map(TickerMetricRow::ticker).collect();
    assert_eq!(tickers, ["ABC", "XYZ", "EMPTY"]);

    let empty = &rows[2];
    assert_eq!(empty.available_metrics(), 0);
    assert_eq!(empty.latest_price, None);
    assert_eq!(empty.metrics.len(), rows[0].metrics.len());
}

#[test]
fn test_filter_on_computed_rows() {
    let registry = MetricRegistry::standard().unwrap();
    let filters = FilterSet::from_params(
        &registry,
        [("min_operating_margin", "0.15"), ("max_operating_margin", "0.25")],
    )
    .unwrap();

    let kept = filters.apply(compute());
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].ticker(), "ABC");

    let none = FilterSet::from_params(&registry, [("min_revenue_growth", "0.5")]).unwrap();
    assert!(none.apply(compute()).is_empty());
}

#[test]
fn test_rerun_is_identical() {
    let first = serde_json::to_string(&compute()).unwrap();
    let second = serde_json::to_string(&compute()).unwrap();
    assert_eq!(first, second);
}
