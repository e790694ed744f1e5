use tokio::sync::watch;

use crate::domain::{Message, MessageId, Transcript, TranscriptError};

/// Single owner of a widget session's transcript.
///
/// Every mutation replaces the watched value in one step, so subscribers only
/// ever see complete snapshots. Renderers should hold a receiver from
/// [`TranscriptStore::subscribe`] and never a reference to the store itself.
pub struct TranscriptStore {
    state: watch::Sender<Transcript>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Transcript::new());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Transcript {
        self.state.borrow().clone()
    }

    pub fn with_transcript<R>(&self, read: impl FnOnce(&Transcript) -> R) -> R {
        read(&self.state.borrow())
    }

    pub fn append(&self, message: Message) -> Result<(), TranscriptError> {
        self.append_batch(vec![message])
    }

    /// Inserts a user message and its reply placeholder as one change.
    pub fn append_exchange(&self, user: Message, reply: Message) -> Result<(), TranscriptError> {
        self.append_batch(vec![user, reply])
    }

    fn append_batch(&self, batch: Vec<Message>) -> Result<(), TranscriptError> {
        let mut outcome = Ok(());
        self.state
            .send_if_modified(|transcript| match transcript.push_all(batch) {
                Ok(()) => true,
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            });
        outcome
    }

    /// No-op (returns `false`) when `id` is unknown, e.g. after a reset.
    pub fn update_text(
        &self,
        id: MessageId,
        text: impl Into<String>,
        still_streaming: bool,
    ) -> bool {
        let text = text.into();
        let applied = self
            .state
            .send_if_modified(|transcript| transcript.update_text(id, text, still_streaming));
        if !applied {
            tracing::trace!(message_id = %id, "Text update ignored");
        }
        applied
    }

    pub fn fail(&self, id: MessageId, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        self.state
            .send_if_modified(|transcript| transcript.fail(id, reason))
    }

    pub fn reset(&self) {
        self.state.send_modify(Transcript::reset);
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}
