//! Results pane rendering

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::{App, Focus};

pub fn render_pane(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.focus == Focus::ResultsPane {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let title = if app.search.is_searching {
        Line::from(Span::styled(
            " Searching… ",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(ref error) = app.search.error {
        Line::from(Span::styled(
            format!(" ⚠ {} ", error),
            Style::default().fg(Color::Red),
        ))
    } else if app.search.results.is_empty() {
        Line::from(Span::styled(" Results ", Style::default().fg(Color::Cyan)))
    } else {
        Line::from(Span::styled(
            format!(" Results ({}) ", app.search.results.len()),
            Style::default().fg(Color::Cyan),
        ))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));

    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .map(|result| ListItem::new(result.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if app.focus == Focus::ResultsPane {
        list_state.select(app.search.selected);
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}
