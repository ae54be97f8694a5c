pub mod layout;
pub mod report;
pub mod theme;
pub mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::state::{AppMode, AppState, Focus},
    ui::{
        layout::{BodyLayout, body_layout},
        theme::{Theme, detect_color_capability, theme_for},
    },
};

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let theme = theme_for(detect_color_capability());

    if area.width < 40 || area.height < 16 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 40x16.")
            .block(Block::default().borders(Borders::ALL).title("gim-viewer"));
        frame.render_widget(warning, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0], state, theme);
    let BodyLayout {
        models,
        calendar,
        chart,
        forecast,
    } = body_layout(rows[1]);
    widgets::models::render(frame, models, state, theme);
    widgets::calendar::render(frame, calendar, state, theme);
    widgets::metrics::render(frame, chart, state, theme);
    widgets::forecast::render(frame, forecast, state, theme);
    render_footer(frame, rows[2], state, theme);

    if state.help_open {
        widgets::help::render(frame, centered_rect(60, 60, area), theme);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let model = state
        .selected_model
        .as_ref()
        .map_or("no model", |model| model.name.as_str());
    let mut spans = vec![
        Span::styled(
            " GIM TEC forecast ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("| {model} "), Style::default().fg(theme.text)),
    ];
    if state.mode == AppMode::Loading || state.models_in_flight {
        spans.push(Span::styled(
            "| loading ",
            Style::default().fg(theme.warning),
        ));
    }
    if let Some(err) = &state.last_error {
        spans.push(Span::styled(
            format!("| {err}"),
            Style::default().fg(theme.danger),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let hints = match state.focus {
        Focus::Models => "Up/Down move  Enter select",
        Focus::Calendar => "arrows move  n/p next/prev forecast  Enter open",
        Focus::Shift => "Left/Right step  Home/End jump",
    };
    let mut spans = vec![Span::styled(
        format!(" {hints}  |  Tab panel  r refresh  d download  ? help  q quit"),
        Style::default().fg(theme.muted_text),
    )];
    if let Some(status) = &state.status {
        spans.push(Span::styled(
            format!("  |  {status}"),
            Style::default().fg(theme.text),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn panel_block(title: &str, focused: bool, theme: Theme) -> Block<'_> {
    let border = if focused {
        theme.focus_border
    } else {
        theme.border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
