use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
};

use crate::{
    app::state::AppState,
    domain::{
        Metric, MetricRecord,
        metrics::{SeriesSummary, contiguous_runs},
    },
    ui::{panel_block, theme::Theme},
};

/// Metrics plotted as lines; MAPE is a percentage and only shows up in the
/// summary row.
const CHARTED: [Metric; 2] = [Metric::Rmse, Metric::Mae];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let range = state.metrics_range;
    let title = format!("Accuracy {} .. {}", range.from(), range.to());
    let block = panel_block(&title, false, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.metrics.iter().all(MetricRecord::is_empty) {
        let text = if state.metrics_loading() {
            "Loading metrics..."
        } else {
            "No metrics for this window"
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.muted_text)),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(summary_line(&SeriesSummary::of(&state.metrics), theme)),
        rows[0],
    );
    render_chart(frame, rows[1], &state.metrics, theme);
}

fn summary_line(summary: &SeriesSummary, theme: Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{}/{} days ", summary.days_with_data, summary.days),
        Style::default().fg(theme.muted_text),
    )];
    for metric in Metric::ALL {
        let value = summary
            .mean(metric)
            .map_or_else(|| "--".to_string(), |mean| format!("{mean:.2}"));
        spans.push(Span::styled(
            format!(" mean {} {value} ", metric.label()),
            Style::default()
                .fg(theme.metric_color(metric))
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

#[allow(clippy::cast_precision_loss)]
fn render_chart(frame: &mut Frame, area: Rect, series: &[MetricRecord], theme: Theme) {
    let runs = CHARTED
        .iter()
        .map(|metric| (*metric, contiguous_runs(series, *metric)))
        .collect::<Vec<_>>();

    let mut datasets = Vec::new();
    for (metric, metric_runs) in &runs {
        for (idx, run) in metric_runs.iter().enumerate() {
            let mut dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.metric_color(*metric)))
                .data(run);
            if idx == 0 {
                dataset = dataset.name(metric.label());
            }
            datasets.push(dataset);
        }
    }

    let y_max = runs
        .iter()
        .flat_map(|(_, metric_runs)| metric_runs.iter().flatten())
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;
    let x_max = series.len().saturating_sub(1).max(1) as f64;

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted_text))
                .bounds([0.0, x_max])
                .labels(x_labels(series)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted_text))
                .bounds([0.0, y_max])
                .labels([
                    Line::from("0"),
                    Line::from(format!("{:.1}", y_max / 2.0)),
                    Line::from(format!("{y_max:.1}")),
                ]),
        );
    frame.render_widget(chart, area);
}

/// First, middle and last day labels of the series.
fn x_labels(series: &[MetricRecord]) -> Vec<Line<'static>> {
    match series {
        [] => Vec::new(),
        [only] => vec![Line::from(only.label.clone())],
        [first, .., last] => {
            let middle = &series[series.len() / 2];
            vec![
                Line::from(first.label.clone()),
                Line::from(middle.label.clone()),
                Line::from(last.label.clone()),
            ]
        }
    }
}
