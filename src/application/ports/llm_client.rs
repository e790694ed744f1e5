use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

pub type LlmTokenStream =
    Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send + 'static>>;

/// Upstream model used by the relay server.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete_stream(&self, prompt: &str) -> Result<LlmTokenStream, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
