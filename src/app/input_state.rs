use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

/// Keyword field state
pub struct InputState {
    pub textarea: TextArea<'static>,
}

impl InputState {
    /// Create a new InputState
    pub fn new() -> Self {
        let mut textarea = TextArea::default();

        // Configure for single-line input
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        // Remove default underline from cursor line
        textarea.set_cursor_line_style(Style::default());

        Self { textarea }
    }

    /// Get the current keyword text
    pub fn keyword(&self) -> &str {
        self.textarea.lines()[0].as_ref()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
