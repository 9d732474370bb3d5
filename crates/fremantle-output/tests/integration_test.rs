//! Integration tests for fremantle-output.

use fremantle_data::ReitProfile;
use fremantle_metrics::{MetricEngine, MetricRegistry, TickerMetricRow};
use fremantle_output::{ExportFormat, Exporter, ScreenResponse, render_table, summarize, to_dataframe};
use std::collections::HashMap;

struct NoData;

impl fremantle_data::FundamentalsSource for NoData {
    fn fetch_line_items(
        &self,
        _: &[String],
        _: &[String],
    ) -> fremantle_data::Result<Vec<fremantle_data::LineItemObservation>> {
        Ok(Vec::new())
    }

    fn fetch_latest_prices(&self, tickers: &[String]) -> fremantle_data::Result<HashMap<String, f64>> {
        Ok(tickers.iter().map(|t| (t.clone(), 42.0)).collect())
    }
}

fn rows(registry: &MetricRegistry) -> Vec<TickerMetricRow> {
    let engine = MetricEngine::new(registry.clone());
    let candidates = vec![
        ReitProfile::new("AAA").with_name("Alpha"),
        ReitProfile::new("BBB"),
    ];
    engine.compute(&NoData, &candidates).unwrap()
}

#[test]
fn test_all_null_rows_keep_every_column() {
    let registry = MetricRegistry::standard().unwrap();
    let rows = rows(&registry);

    let json: serde_json::Value =
        serde_json::from_str(&rows.export_to_string(ExportFormat::Json).unwrap()).unwrap();
    let first = json[0].as_object().unwrap();
    for name in registry.names() {
        assert!(first.get(name).unwrap().is_null(), "{name} should be null");
    }
    assert_eq!(first["latest_price"], 42.0);

    let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(header.split(',').count(), 7 + registry.len());
}

#[test]
fn test_dataframe_and_summary_match_registry() {
    let registry = MetricRegistry::standard().unwrap();
    let rows = rows(&registry);

    let df = to_dataframe(&rows).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 5 + registry.len());

    let summary = summarize(&rows).unwrap();
    assert_eq!(summary.len(), registry.len());
    assert!(summary.iter().all(|s| s.available == 0));
}

#[test]
fn test_response_and_text_table() {
    let registry = MetricRegistry::standard().unwrap();
    let response = ScreenResponse::new("No descriptive filters applied".into(), rows(&registry));

    let pretty = response.export_to_string(ExportFormat::PrettyJson).unwrap();
    assert!(pretty.contains("\"explanation\": \"No descriptive filters applied\""));

    let table = render_table(&registry, &response.reits);
    assert_eq!(table.lines().count(), 4);
    assert!(table.contains("42.00"));
}
