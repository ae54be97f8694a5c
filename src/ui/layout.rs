use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLayout {
    pub models: Rect,
    pub calendar: Rect,
    pub chart: Rect,
    pub forecast: Rect,
}

/// Width of the left column holding the model list and calendar. The
/// calendar grid needs 7 cells of 3 columns plus borders.
#[must_use]
pub fn side_width(width: u16) -> u16 {
    match width {
        120..=u16::MAX => 34,
        80..=119 => 30,
        _ => 25,
    }
}

#[must_use]
pub fn body_layout(area: Rect) -> BodyLayout {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(side_width(area.width)), Constraint::Min(10)])
        .split(area);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(11)])
        .split(columns[0]);
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    BodyLayout {
        models: side[0],
        calendar: side[1],
        chart: main[0],
        forecast: main[1],
    }
}
