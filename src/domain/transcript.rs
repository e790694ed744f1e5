use super::{Message, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("message {0} already exists in the transcript")]
    DuplicateId(MessageId),
    #[error("message {0} is still streaming")]
    StreamingInProgress(MessageId),
}

/// Ordered conversation history for one widget session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn streaming(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_streaming())
    }

    pub fn streaming_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_streaming()).count()
    }

    /// True while the transcript holds nothing but the opening greeting.
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1
    }

    /// Appends every message or none of them.
    pub fn push_all(&mut self, batch: Vec<Message>) -> Result<(), TranscriptError> {
        let mut streaming = self.streaming().map(|m| m.id);

        for (index, message) in batch.iter().enumerate() {
            let duplicate = self.get(message.id).is_some()
                || batch[..index].iter().any(|m| m.id == message.id);
            if duplicate {
                return Err(TranscriptError::DuplicateId(message.id));
            }
            if message.is_streaming() {
                if let Some(active) = streaming {
                    return Err(TranscriptError::StreamingInProgress(active));
                }
                streaming = Some(message.id);
            }
        }

        self.messages.extend(batch);
        Ok(())
    }

    pub fn push(&mut self, message: Message) -> Result<(), TranscriptError> {
        self.push_all(vec![message])
    }

    pub fn update_text(&mut self, id: MessageId, text: String, still_streaming: bool) -> bool {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .is_some_and(|m| m.apply_text(text, still_streaming))
    }

    pub fn fail(&mut self, id: MessageId, reason: String) -> bool {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .is_some_and(|m| m.apply_failure(reason))
    }

    pub fn reset(&mut self) {
        self.messages = vec![Message::greeting()];
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
