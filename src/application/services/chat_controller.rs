use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use futures::stream::StreamExt;
use tracing::Instrument;

use super::stream_decoder::{DecodeError, Utf8StreamDecoder};
use super::transcript_store::TranscriptStore;
use crate::application::ports::{GenerationClient, TransportError};
use crate::domain::{Message, MessageId, TranscriptError};
use crate::infrastructure::observability::redact_query;

/// Why a submission was turned away before any request was issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("query is empty")]
    EmptyQuery,
    #[error("an exchange is already in flight")]
    Busy,
    #[error("transcript is no longer available")]
    Detached,
    #[error("no quick question at index {0}")]
    UnknownPreset(usize),
    #[error("transcript rejected the exchange: {0}")]
    Transcript(#[from] TranscriptError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Rejected(SubmitRejection),
    Completed {
        reply_id: MessageId,
        text: String,
    },
    Failed {
        reply_id: MessageId,
        error: ExchangeError,
    },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected(_))
    }
}

/// Drives at most one query/response exchange at a time.
pub struct ChatController<G: GenerationClient + ?Sized> {
    client: Arc<G>,
    transcript: Weak<TranscriptStore>,
    busy: Arc<AtomicBool>,
}

impl<G: GenerationClient + ?Sized> ChatController<G> {
    pub fn new(client: Arc<G>, transcript: &Arc<TranscriptStore>) -> Self {
        Self {
            client,
            transcript: Arc::downgrade(transcript),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Accepts a submission: trims it, claims the controller and appends the
    /// user message together with an empty reply placeholder.
    ///
    /// No network traffic happens until [`Exchange::run`] is awaited.
    pub fn begin(&self, raw: &str) -> Result<Exchange<G>, SubmitRejection> {
        let query = raw.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring empty submission");
            return Err(SubmitRejection::EmptyQuery);
        }

        let Some(busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!(query = %redact_query(query), "Ignoring submission while busy");
            return Err(SubmitRejection::Busy);
        };

        let transcript = self
            .transcript
            .upgrade()
            .ok_or(SubmitRejection::Detached)?;

        let reply = Message::placeholder();
        let reply_id = reply.id;
        transcript.append_exchange(Message::user(query), reply)?;

        Ok(Exchange {
            client: Arc::clone(&self.client),
            transcript: Weak::clone(&self.transcript),
            query: query.to_string(),
            reply_id,
            finalized: false,
            _busy: busy,
        })
    }

    pub async fn submit(&self, raw: &str) -> SubmitOutcome {
        match self.begin(raw) {
            Ok(exchange) => exchange.run().await,
            Err(rejection) => SubmitOutcome::Rejected(rejection),
        }
    }
}

/// An accepted submission whose reply has not been finalized yet.
///
/// Dropping it before [`Exchange::run`] completes marks the reply as failed
/// and releases the controller.
pub struct Exchange<G: GenerationClient + ?Sized> {
    client: Arc<G>,
    transcript: Weak<TranscriptStore>,
    query: String,
    reply_id: MessageId,
    finalized: bool,
    _busy: BusyGuard,
}

impl<G: GenerationClient + ?Sized> Exchange<G> {
    pub fn reply_id(&self) -> MessageId {
        self.reply_id
    }

    pub async fn run(mut self) -> SubmitOutcome {
        let span = tracing::info_span!(
            "exchange",
            reply_id = %self.reply_id,
            query = %redact_query(&self.query)
        );
        self.settle().instrument(span).await
    }

    async fn settle(&mut self) -> SubmitOutcome {
        let outcome = match self.stream_reply().await {
            Ok(text) => {
                let reply_id = self.reply_id;
                self.publish(|store| store.update_text(reply_id, text.clone(), false));
                tracing::info!(reply_len = text.len(), "Reply completed");
                SubmitOutcome::Completed { reply_id, text }
            }
            Err(error) => {
                match &error {
                    ExchangeError::Transport(e) => {
                        tracing::warn!(error = %e, "Reply failed in transport")
                    }
                    ExchangeError::Decode(e) => {
                        tracing::warn!(error = %e, "Reply failed to decode")
                    }
                }
                let reply_id = self.reply_id;
                let reason = error.to_string();
                self.publish(|store| store.fail(reply_id, reason));
                SubmitOutcome::Failed { reply_id, error }
            }
        };
        self.finalized = true;
        outcome
    }

    async fn stream_reply(&self) -> Result<String, ExchangeError> {
        let mut chunks = self.client.open(&self.query).await?;
        let mut decoder = Utf8StreamDecoder::new();
        let mut reply = String::new();
        let mut chunk_count = 0usize;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            reply.push_str(&decoder.decode(&chunk)?);
            chunk_count += 1;
            self.publish(|store| store.update_text(self.reply_id, reply.clone(), true));
        }
        decoder.finish()?;

        tracing::debug!(chunk_count, "Reply stream drained");
        Ok(reply)
    }

    /// Applies an update unless the transcript has been torn down.
    fn publish(&self, update: impl FnOnce(&TranscriptStore) -> bool) {
        match self.transcript.upgrade() {
            Some(store) => {
                update(&store);
            }
            None => {
                tracing::trace!(reply_id = %self.reply_id, "Transcript gone, update dropped")
            }
        }
    }
}

impl<G: GenerationClient + ?Sized> Drop for Exchange<G> {
    fn drop(&mut self) {
        if !self.finalized {
            tracing::warn!(reply_id = %self.reply_id, "Exchange abandoned before completion");
            let reply_id = self.reply_id;
            self.publish(|store| store.fail(reply_id, "exchange abandoned"));
        }
    }
}

struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
