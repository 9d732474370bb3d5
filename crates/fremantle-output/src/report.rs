//! Fixed-width text tables for the terminal.

use fremantle_metrics::{MetricDefinition, MetricRegistry, TickerMetricRow};
use std::fmt::Write;

/// Placeholder for an absent value.
pub const MISSING: &str = "—";

/// Format one metric value for display.
///
/// Percentage metrics are shown as `12.34%`, everything else with two
/// decimals. Absent values are shown as [`MISSING`].
pub fn format_value(value: Option<f64>, percentage: bool) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if percentage => format!("{:.2}%", v * 100.0),
        Some(v) => format!("{:.2}", v),
    }
}

fn render(headers: &[String], body: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    let line = |out: &mut String, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                // First column left aligned, numbers right aligned
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    line(&mut out, headers);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in body {
        line(&mut out, row);
    }
    out
}

/// Render rows with one column per configured metric.
pub fn render_table(registry: &MetricRegistry, rows: &[TickerMetricRow]) -> String {
    let mut headers = vec!["ticker".to_string(), "price".to_string()];
    headers.extend(registry.iter().map(|d| d.name.clone()));

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.ticker().to_string(), format_value(row.latest_price, false)];
            cells.extend(
                registry
                    .iter()
                    .map(|d| format_value(row.metric(&d.name), d.percentage)),
            );
            cells
        })
        .collect();

    render(&headers, &body)
}

/// Render metric definitions: name, category, policy, prefix and sources.
pub fn render_definitions<'a, I>(definitions: I) -> String
where
    I: IntoIterator<Item = &'a MetricDefinition>,
{
    let headers: Vec<String> = ["metric", "category", "policy", "filter prefix", "line items"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let body: Vec<Vec<String>> = definitions
        .into_iter()
        .map(|d| {
            let name = if d.percentage {
                format!("{} (%)", d.name)
            } else {
                d.name.clone()
            };
            vec![
                name,
                d.category.to_string(),
                d.policy.to_string(),
                d.filter_prefix.clone(),
                d.line_items.join(" / "),
            ]
        })
        .collect();

    render(&headers, &body)
}
