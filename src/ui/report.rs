use std::fmt::Write as _;

use crate::domain::{
    AvailabilityIndex, DateInterval, Metric, MetricRecord, ModelInfo, metrics::SeriesSummary,
};

/// Plain-text report printed by `--one-shot`.
#[must_use]
pub fn render_report(
    model: &ModelInfo,
    index: &AvailabilityIndex,
    interval: DateInterval,
    series: &[MetricRecord],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model: {} ({})", model.name, model.code);
    let latest = index
        .latest()
        .map_or_else(|| "none".to_string(), |day| day.to_string());
    let _ = writeln!(
        out,
        "Forecasts: {} on {} day(s), latest {latest}",
        index.len(),
        index.available_days().len()
    );
    let _ = writeln!(out, "Metrics: {interval}");
    out.push_str(&metrics_table(series));

    let summary = SeriesSummary::of(series);
    let _ = write!(
        out,
        "Days with data: {}/{}",
        summary.days_with_data, summary.days
    );
    for metric in Metric::ALL {
        let _ = write!(out, "  mean {} {}", metric.label(), cell(summary.mean(metric)));
    }
    out.push('\n');
    out
}

#[must_use]
pub fn metrics_table(series: &[MetricRecord]) -> String {
    let mut out = format!(
        "{:<12} {:<8} {:>9} {:>9} {:>9}\n",
        "date",
        "label",
        Metric::Rmse.label(),
        Metric::Mae.label(),
        Metric::Mape.label()
    );
    for record in series {
        let _ = writeln!(
            out,
            "{:<12} {:<8} {:>9} {:>9} {:>9}",
            record.day.to_string(),
            record.label,
            cell(record.rmse),
            cell(record.mae),
            cell(record.mape)
        );
    }
    out
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.3}"))
}
