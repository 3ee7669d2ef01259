// src/store.rs

use crate::agents::USER_AGENT;
use uuid::Uuid;

/// One entry in the discussion transcript. `text` only ever grows, and only
/// while the message sits at the tail of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub agent: String,
    pub text: String,
}

impl Message {
    fn new(agent: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent: agent.to_string(),
            text: text.to_string(),
        }
    }
}

/// Ordered transcript of the discussion. Mutators return a new snapshot with
/// a bumped version instead of editing in place, so the UI can detect changes
/// by comparing versions.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    version: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Folds an incremental chunk into the transcript. Consecutive chunks
    /// from the same agent extend the tail message; a different agent starts
    /// a new one.
    pub fn with_chunk(&self, agent: &str, text: &str) -> Self {
        let mut messages = self.messages.clone();
        match messages.last_mut() {
            Some(last) if last.agent == agent => last.text.push_str(text),
            _ => messages.push(Message::new(agent, text)),
        }
        Self {
            messages,
            version: self.version + 1,
        }
    }

    /// Appends a complete utterance. Unlike `with_chunk` this never merges,
    /// matching the legacy frame shape where each frame is a whole message.
    pub fn with_full(&self, agent: &str, text: &str) -> Self {
        let mut messages = self.messages.clone();
        messages.push(Message::new(agent, text));
        Self {
            messages,
            version: self.version + 1,
        }
    }

    /// Records the user's submitted question as a closed message.
    pub fn with_user_question(&self, text: &str) -> Self {
        self.with_full(USER_AGENT, text)
    }
}
