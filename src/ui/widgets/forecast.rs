use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::{
    app::state::{AppState, Focus, ImageView},
    domain::day_key_of,
    ui::{panel_block, theme::Theme},
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let block = panel_block("Forecast", state.focus == Focus::Shift, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(forecast) = &state.selected_forecast else {
        let text = if state.forecasts_loading() {
            "Loading forecasts..."
        } else {
            "No forecast selected"
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.muted_text)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let header = Line::from(vec![
        Span::styled(
            format!("#{} ", forecast.id),
            Style::default()
                .fg(theme.selected)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("starts {} ", day_key_of(&forecast.start_date)),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("({})", forecast.model_code),
            Style::default().fg(theme.muted_text),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), rows[0]);

    frame.render_widget(shift_gauge(state, theme), rows[1]);
    frame.render_widget(
        Paragraph::new(image_lines(&state.image, theme)).wrap(Wrap { trim: true }),
        rows[2],
    );
}

#[allow(clippy::cast_precision_loss)]
fn shift_gauge(state: &AppState, theme: Theme) -> Gauge<'static> {
    let shift = state.nav.shift();
    let last = *state.nav.shift_range().end();
    let ratio = if last == 0 {
        1.0
    } else {
        f64::from(shift) / f64::from(last)
    };
    let suffix = if state.size_loading() { " ..." } else { "" };
    Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.surface))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("shift {shift} / {last}{suffix}"))
}

fn image_lines(image: &ImageView, theme: Theme) -> Vec<Line<'static>> {
    match image {
        ImageView::Empty => vec![Line::from(Span::styled(
            "No map requested",
            Style::default().fg(theme.muted_text),
        ))],
        ImageView::Loading => vec![Line::from(Span::styled(
            "Loading map...",
            Style::default().fg(theme.warning),
        ))],
        ImageView::Ready(payload) => vec![
            Line::from(Span::styled(
                format!(
                    "Map ready: {} ({:.1} KiB)",
                    payload.content_type,
                    kib(payload.bytes.len())
                ),
                Style::default().fg(theme.success),
            )),
            Line::from(Span::styled(
                "Press d to save the full forecast archive",
                Style::default().fg(theme.muted_text),
            )),
        ],
        ImageView::Failed(err) => vec![Line::from(Span::styled(
            format!("Map unavailable: {err}"),
            Style::default().fg(theme.danger),
        ))],
    }
}

#[allow(clippy::cast_precision_loss)]
fn kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}
