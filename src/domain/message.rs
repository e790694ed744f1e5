use chrono::{DateTime, Utc};

use super::{MessageId, Sender};

pub const GREETING_TEXT: &str =
    "Hello! I'm your enhanced Amex assistant. How can I help you today?";

/// Shown in place of any partial reply when an exchange fails.
pub const FAILURE_TEXT: &str = "Sorry, bot failed to respond.";

/// Lifecycle of a message's content.
///
/// User messages and the greeting are created `Completed`. A bot reply starts
/// `Pending`, moves to `Streaming` as chunks arrive and ends in either
/// `Completed` or `Failed`. Terminal states are frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageState {
    Pending,
    Streaming(String),
    Completed(String),
    Failed { reason: String },
}

impl MessageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageState::Completed(_) | MessageState::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    state: MessageState,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_state(Sender::User, MessageState::Completed(text.into()))
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::with_state(Sender::Bot, MessageState::Completed(text.into()))
    }

    /// Empty bot reply awaiting its first chunk.
    pub fn placeholder() -> Self {
        Self::with_state(Sender::Bot, MessageState::Pending)
    }

    pub fn greeting() -> Self {
        Self::bot(GREETING_TEXT)
    }

    fn with_state(sender: Sender, state: MessageState) -> Self {
        Self {
            id: MessageId::generate(),
            sender,
            created_at: Utc::now(),
            state,
        }
    }

    pub fn state(&self) -> &MessageState {
        &self.state
    }

    pub fn text(&self) -> &str {
        match &self.state {
            MessageState::Pending => "",
            MessageState::Streaming(text) | MessageState::Completed(text) => text,
            MessageState::Failed { .. } => FAILURE_TEXT,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(
            self.state,
            MessageState::Pending | MessageState::Streaming(_)
        )
    }

    /// Replaces the text of an in-flight bot reply.
    ///
    /// Returns `false` without touching the message when it belongs to the
    /// user, is already terminal, or when a still-streaming update would
    /// shrink the text.
    pub(crate) fn apply_text(&mut self, text: String, still_streaming: bool) -> bool {
        if self.sender != Sender::Bot || self.state.is_terminal() {
            return false;
        }
        if still_streaming && text.len() < self.text().len() {
            return false;
        }

        self.state = if still_streaming {
            MessageState::Streaming(text)
        } else {
            MessageState::Completed(text)
        };
        true
    }

    pub(crate) fn apply_failure(&mut self, reason: String) -> bool {
        if self.sender != Sender::Bot || self.state.is_terminal() {
            return false;
        }
        self.state = MessageState::Failed { reason };
        true
    }
}
