use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, theme: Theme) {
    frame.render_widget(Clear, area);

    let panel_style = Style::default()
        .fg(theme.text)
        .bg(theme.popup_surface);
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .style(panel_style)
        .border_style(Style::default().fg(theme.focus_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = Paragraph::new(help_lines(theme))
        .style(panel_style)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, inner);
}

fn help_lines(theme: Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_section(
        &mut lines,
        theme,
        "Global",
        [
            "q / Esc quit  |  Ctrl+C immediate quit",
            "Tab / Shift+Tab switch panel  |  ? toggle help",
            "r reload metrics  |  d save forecast archive",
        ],
    );
    push_section(
        &mut lines,
        theme,
        "Models",
        ["Up/Down move  |  Enter switch model"],
    );
    push_section(
        &mut lines,
        theme,
        "Forecast days",
        [
            "Arrows move the cursor a day or a week",
            "n / p jump to the next / previous forecast day",
            "Enter opens the forecast on the cursor day",
        ],
    );
    push_section(
        &mut lines,
        theme,
        "Forecast",
        ["Left/Right step the time shift  |  Home/End first/last"],
    );
    lines.push(Line::from(Span::styled(
        "Esc / ? closes this help",
        Style::default()
            .fg(theme.muted_text)
            .add_modifier(Modifier::BOLD),
    )));
    lines
}

fn push_section<const N: usize>(
    lines: &mut Vec<Line<'static>>,
    theme: Theme,
    title: &'static str,
    body: [&'static str; N],
) {
    lines.push(Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(body.into_iter().map(Line::from));
    lines.push(Line::from(""));
}
