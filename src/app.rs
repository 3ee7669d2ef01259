// src/app.rs

use crate::log_view::LogView;
use crate::status_indicator::StatusIndicator;
use crate::store::MessageStore;

/// Top-level UI state, shared between the event loop and the streaming task
/// behind an `Arc<tokio::sync::Mutex<_>>`.
pub struct App {
    pub store: MessageStore,
    pub input: String,
    pub turn_in_progress: bool,
    pub scroll: u16,
    pub logs: LogView,
    pub status_indicator: StatusIndicator,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> App {
        App {
            store: MessageStore::new(),
            input: String::new(),
            turn_in_progress: false,
            scroll: 0,
            logs: LogView::new(),
            status_indicator: StatusIndicator::new(),
            should_quit: false,
        }
    }

    /// Accepts the current input as a question. Returns the question text to
    /// dispatch, or `None` when the input is blank or a turn is already in
    /// progress — in that case nothing is mutated and no request may be
    /// issued. The `turn_in_progress` flag is the sole concurrency guard:
    /// at most one streaming request is ever open.
    pub fn submit(&mut self) -> Option<String> {
        if self.turn_in_progress || self.input.trim().is_empty() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.store = self.store.with_user_question(&question);
        self.turn_in_progress = true;
        self.status_indicator.set_busy(true);
        Some(question)
    }

    /// Marks the turn as finished. The transcript is left untouched.
    pub fn end_turn(&mut self) {
        self.turn_in_progress = false;
        self.status_indicator.set_busy(false);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::USER_AGENT;

    #[test]
    fn test_submit_records_question_and_clears_input() {
        let mut app = App::new();
        app.input = "serverlessとは？".to_string();
        let question = app.submit();
        assert_eq!(question.as_deref(), Some("serverlessとは？"));
        assert!(app.input.is_empty());
        assert!(app.turn_in_progress);
        assert_eq!(app.store.messages().len(), 1);
        assert_eq!(app.store.messages()[0].agent, USER_AGENT);
    }

    #[test]
    fn test_submit_empty_input_is_noop() {
        let mut app = App::new();
        assert_eq!(app.submit(), None);
        app.input = "   ".to_string();
        assert_eq!(app.submit(), None);
        assert!(app.store.is_empty());
        assert!(!app.turn_in_progress);
        // The whitespace input is kept, not cleared.
        assert_eq!(app.input, "   ");
    }

    #[test]
    fn test_submit_during_turn_is_noop() {
        let mut app = App::new();
        app.input = "first".to_string();
        assert!(app.submit().is_some());
        app.input = "second".to_string();
        assert_eq!(app.submit(), None);
        assert_eq!(app.store.messages().len(), 1);
        assert_eq!(app.input, "second");
    }

    #[test]
    fn test_end_turn_reenables_submission() {
        let mut app = App::new();
        app.input = "first".to_string();
        app.submit();
        app.end_turn();
        assert!(!app.turn_in_progress);
        app.input = "second".to_string();
        assert!(app.submit().is_some());
        assert_eq!(app.store.messages().len(), 2);
    }
}
