//! Debounce gate for search requests
//!
//! Delays the search attempt until keyword/limit input has been stable for
//! the configured quiescence window (default 500ms). Every change re-arms
//! the timer, so rapid keystrokes collapse into a single request.

use std::time::{Duration, Instant};

/// Default quiescence window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Manages debounced search attempt timing.
///
/// Tracks when the last input occurred and whether an attempt is pending.
/// The attempt fires only once the configured period has elapsed since the
/// last input.
#[derive(Debug)]
pub struct Debouncer {
    /// Quiescence window in milliseconds
    delay_ms: u64,
    /// Timestamp of the last input that re-armed the gate
    last_input_time: Option<Instant>,
    /// Whether a search attempt is waiting for the window to elapse
    pending: bool,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_input_time: None,
            pending: false,
        }
    }

    /// Arm (or re-arm) the gate.
    ///
    /// Called on every keyword or limit change; each call resets the timer.
    pub fn schedule(&mut self) {
        self.last_input_time = Some(Instant::now());
        self.pending = true;
    }

    /// Drop any pending attempt without firing it.
    ///
    /// Used for the empty-keyword terminal state, the commit key (which runs
    /// the attempt itself), and teardown.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.last_input_time = None;
    }

    /// True once a pending attempt has outlived the quiescence window
    pub fn is_ready(&self) -> bool {
        if !self.pending {
            return false;
        }

        match self.last_input_time {
            Some(last_time) => last_time.elapsed() >= Duration::from_millis(self.delay_ms),
            None => false,
        }
    }

    /// Mark the pending attempt as fired
    pub fn mark_executed(&mut self) {
        self.pending = false;
        self.last_input_time = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
