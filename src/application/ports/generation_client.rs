use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};

/// JSON body posted to the text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub query: String,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;

/// Opens a streamed reply for a single query.
///
/// The returned stream yields raw, unframed bytes of plain text in the order
/// the transport delivered them.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn open(&self, query: &str) -> Result<ByteStream, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response has no body")]
    MissingBody,
    #[error("reading response body failed: {0}")]
    Body(String),
}
