use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::state::{App, Focus};
use crate::notification::render_notification;
use crate::search::search_render;

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        // Split the terminal into three areas: results, input, and status
        let layout = Layout::vertical([
            Constraint::Min(3),    // Results pane takes most of the space
            Constraint::Length(3), // Input field is fixed 3 lines
            Constraint::Length(1), // Status line at bottom
        ])
        .split(frame.area());

        let results_area = layout[0];
        let input_area = layout[1];
        let status_area = layout[2];

        search_render::render_pane(self, frame, results_area);
        self.render_input_field(frame, input_area);
        self.render_status_line(frame, status_area);

        // Render last so it overlays the panes
        render_notification(frame, &mut self.notification);
    }

    /// Render the keyword field
    fn render_input_field(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = if self.focus == Focus::InputField {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        self.input.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .border_style(Style::default().fg(border_color)),
        );

        frame.render_widget(&self.input.textarea, area);
    }

    /// Render the status line with the active limit and keybindings
    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" limit: {} ", self.search.limit),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                "│ Tab limit │ Enter search │ ↓ results │ Esc quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
