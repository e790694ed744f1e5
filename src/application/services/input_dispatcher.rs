use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::chat_controller::{ChatController, Exchange, SubmitOutcome, SubmitRejection};
use super::transcript_store::TranscriptStore;
use crate::application::ports::GenerationClient;
use crate::domain::Transcript;

/// Entry points of the chat panel: the free-text field, the preset quick
/// questions and the clear button.
///
/// Dropping the dispatcher tears the transcript down; any exchange still
/// streaming keeps draining but its updates are discarded.
pub struct InputDispatcher<G: GenerationClient + ?Sized> {
    transcript: Arc<TranscriptStore>,
    controller: ChatController<G>,
    draft: Mutex<String>,
    quick_questions: Vec<String>,
}

impl<G: GenerationClient + ?Sized> InputDispatcher<G> {
    pub fn new(client: Arc<G>, quick_questions: Vec<String>) -> Self {
        let transcript = Arc::new(TranscriptStore::new());
        let controller = ChatController::new(client, &transcript);
        Self {
            transcript,
            controller,
            draft: Mutex::new(String::new()),
            quick_questions,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.transcript.subscribe()
    }

    pub fn snapshot(&self) -> Transcript {
        self.transcript.snapshot()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.lock_draft() = text.into();
    }

    pub fn draft(&self) -> String {
        self.lock_draft().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn input_enabled(&self) -> bool {
        !self.is_busy()
    }

    pub fn send_enabled(&self) -> bool {
        self.input_enabled() && !self.lock_draft().trim().is_empty()
    }

    /// Presets are offered only until the first exchange starts, and never
    /// while one is in flight.
    pub fn visible_quick_questions(&self) -> &[String] {
        if !self.is_busy() && self.transcript.with_transcript(Transcript::is_fresh) {
            &self.quick_questions
        } else {
            &[]
        }
    }

    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.draft();
        match self.accept(&draft) {
            Ok(exchange) => exchange.run().await,
            Err(rejection) => SubmitOutcome::Rejected(rejection),
        }
    }

    pub async fn ask_quick_question(&self, index: usize) -> SubmitOutcome {
        let Some(question) = self.quick_questions.get(index) else {
            return SubmitOutcome::Rejected(SubmitRejection::UnknownPreset(index));
        };
        match self.accept(question) {
            Ok(exchange) => exchange.run().await,
            Err(rejection) => SubmitOutcome::Rejected(rejection),
        }
    }

    /// Resets the transcript whether or not an exchange is in flight.
    pub fn clear_chat(&self) {
        self.transcript.reset();
        tracing::info!(busy = self.is_busy(), "Chat cleared");
    }

    fn accept(&self, text: &str) -> Result<Exchange<G>, SubmitRejection> {
        let exchange = self.controller.begin(text)?;
        self.lock_draft().clear();
        Ok(exchange)
    }

    fn lock_draft(&self) -> MutexGuard<'_, String> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
