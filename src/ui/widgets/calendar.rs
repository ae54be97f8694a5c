use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::state::{AppState, Focus},
    domain::{CalendarDay, calendar::month_grid, day_key_of},
    ui::{panel_block, theme::Theme},
};

const WEEKDAYS: &str = " Mo Tu We Th Fr Sa Su";

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let focused = state.focus == Focus::Calendar;
    let block = panel_block("Forecast days", focused, theme);
    let lines = calendar_lines(state, focused, theme);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn calendar_lines(state: &AppState, focused: bool, theme: Theme) -> Vec<Line<'static>> {
    let cursor = state.calendar_cursor;
    let selected = state
        .selected_forecast
        .as_ref()
        .map(|forecast| day_key_of(&forecast.start_date));

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", cursor.date().format("%B %Y")),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(WEEKDAYS, Style::default().fg(theme.muted_text))),
    ];

    for week in month_grid(cursor.year(), cursor.month()) {
        let spans = week
            .iter()
            .map(|cell| match cell {
                Some(day) => Span::styled(
                    format!(" {:>2}", day.day()),
                    cell_style(state, *day, selected, focused, theme),
                ),
                None => Span::raw("   "),
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }

    let available = state.index.days_in_month(cursor.year(), cursor.month()).len();
    lines.push(Line::from(Span::styled(
        format!(" {available} forecast day(s)"),
        Style::default().fg(theme.muted_text),
    )));
    lines
}

fn cell_style(
    state: &AppState,
    day: CalendarDay,
    selected: Option<CalendarDay>,
    focused: bool,
    theme: Theme,
) -> Style {
    let mut style = if selected == Some(day) {
        Style::default()
            .fg(theme.selected)
            .add_modifier(Modifier::BOLD)
    } else if state.index.is_available(day) {
        Style::default()
            .fg(theme.available)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted_text)
    };
    if focused && day == state.calendar_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}
