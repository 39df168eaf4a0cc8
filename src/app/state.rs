use super::input_state::InputState;
use crate::config::Config;
use crate::notification::NotificationState;
use crate::search::{ResultLimit, SearchState};

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    InputField,
    ResultsPane,
}

/// Application state
pub struct App {
    pub input: InputState,
    pub search: SearchState,
    pub focus: Focus,
    pub notification: NotificationState,
    /// Result the user picked; printed to stdout after terminal restore
    pub selection: Option<String>,
    pub should_quit: bool,
    /// Render only when something changed since the last frame
    dirty: bool,
}

impl App {
    /// Create a new App instance from loaded configuration
    pub fn new(config: &Config) -> Self {
        // The limit was validated at load time; fall back defensively anyway
        let limit = ResultLimit::from_value(config.search.limit).unwrap_or_default();

        Self {
            input: InputState::new(),
            search: SearchState::new(limit, config.search.debounce_ms),
            focus: Focus::InputField,
            notification: NotificationState::new(),
            selection: None,
            should_quit: false,
            dirty: true,
        }
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the current keyword text
    pub fn keyword(&self) -> &str {
        self.input.keyword()
    }

    pub fn should_render(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
