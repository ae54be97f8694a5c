use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::state::{AppState, Focus},
    ui::{panel_block, theme::Theme},
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let block = panel_block("Models", state.focus == Focus::Models, theme);

    if state.models.is_empty() {
        let text = if state.models_in_flight {
            "Loading models..."
        } else {
            "No models"
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(theme.muted_text))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let active = state.selected_model.as_ref().map(|model| model.code.as_str());
    let items = state
        .models
        .iter()
        .map(|model| {
            let is_active = active == Some(model.code.as_str());
            let marker = if is_active { "● " } else { "  " };
            let style = if is_active {
                Style::default().fg(theme.selected)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(model.name.clone(), style),
            ]))
        })
        .collect::<Vec<_>>();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::REVERSED),
    );
    let mut list_state = ListState::default();
    if state.focus == Focus::Models {
        list_state.select(state.model_cursor());
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
