use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::presentation::config::ScaffoldConfig;

/// Upstream stand-in for scaffold mode: echoes the prompt back word by word.
pub struct MockLlmClient {
    token_delay: Duration,
}

impl MockLlmClient {
    pub fn new(token_delay: Duration) -> Self {
        Self { token_delay }
    }

    pub fn from_config(config: &ScaffoldConfig) -> Self {
        Self::new(Duration::from_millis(config.mock_response_delay_ms))
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete_stream(&self, prompt: &str) -> Result<LlmTokenStream, LlmClientError> {
        let reply = format!("Scaffold reply to \"{}\".", prompt);
        let tokens: Vec<String> = reply.split_inclusive(' ').map(str::to_string).collect();
        let delay = self.token_delay;

        let token_stream = stream::iter(tokens).then(move |token| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, LlmClientError>(token)
        });
        Ok(Box::pin(token_stream))
    }
}
