use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use super::state::{App, Focus};
use crate::search::search_events;

/// Timeout for event polling - lets the debounce timer and worker responses
/// be observed without a keypress
const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

impl App {
    /// Handle events and update application state
    pub fn handle_events(&mut self) -> io::Result<()> {
        // Fire the pending search once the quiescence window has elapsed
        if self.search.debouncer.is_ready() {
            search_events::handle_debounce_fire(&mut self.search);
            self.mark_dirty();
        }

        // Drain completed requests from the worker thread
        if search_events::poll_response_channel(&mut self.search) {
            self.mark_dirty();
        }

        if self.notification.clear_if_expired() {
            self.mark_dirty();
        }

        // Poll with timeout so the loop keeps ticking while idle
        if event::poll(EVENT_POLL_TIMEOUT)? {
            match event::read()? {
                // Check that it's a key press event to avoid duplicates
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key_event(key_event);
                    self.mark_dirty();
                }
                // Handle paste events (bracketed paste mode)
                Event::Paste(text) => {
                    self.handle_paste_event(text);
                    self.mark_dirty();
                }
                Event::Resize(_, _) => self.mark_dirty(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handle key press events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global keys first
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Tab cycles the result-count cap. The cache key depends on it, so
        // the pipeline re-arms exactly like a keyword change.
        if key.code == KeyCode::Tab {
            self.search.cycle_limit();
            let keyword = self.keyword().to_string();
            search_events::handle_input_change(&mut self.search, &keyword);
            return;
        }

        match self.focus {
            Focus::InputField => self.handle_input_field_key(key),
            Focus::ResultsPane => self.handle_results_pane_key(key),
        }
    }

    /// Handle keys when the keyword field is focused
    fn handle_input_field_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Enter => {
                // Commit: search now, bypassing the debounce window
                let keyword = self.keyword().to_string();
                search_events::handle_commit(&mut self.search, &keyword);
            }
            KeyCode::Down => {
                if !self.search.results.is_empty() {
                    self.focus = Focus::ResultsPane;
                    self.search.select_first();
                }
            }
            _ => {
                // Forward to the textarea; only text edits re-arm the gate
                if self.input.textarea.input(key) {
                    let keyword = self.keyword().to_string();
                    search_events::handle_input_change(&mut self.search, &keyword);
                }
            }
        }
    }

    /// Handle keys when the results pane is focused
    fn handle_results_pane_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::InputField;
                self.search.selected = None;
            }
            KeyCode::Up | KeyCode::Char('k') if self.search.selected == Some(0) => {
                // Walking off the top returns to the keyword field
                self.focus = Focus::InputField;
                self.search.selected = None;
            }
            KeyCode::Up | KeyCode::Char('k') => self.search.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.search.select_next(),
            KeyCode::Enter => {
                if let Some(result) = search_events::select_search_result(&self.search) {
                    self.selection = Some(result);
                    self.should_quit = true;
                }
            }
            _ => {}
        }
    }

    /// Paste is an ordinary input change; the debounce gate settles it
    fn handle_paste_event(&mut self, text: String) {
        self.input.textarea.insert_str(&text);
        let keyword = self.keyword().to_string();
        search_events::handle_input_change(&mut self.search, &keyword);
    }
}
