use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::{Client, StatusCode};

use crate::application::ports::{ByteStream, GenerationClient, GenerationRequest, TransportError};
use crate::application::services::InputDispatcher;
use crate::presentation::config::WidgetSettings;

/// Posts queries to the relay's `/generate` endpoint and exposes the raw
/// response body as a byte stream.
pub struct HttpGenerationClient {
    client: Client,
    endpoint: String,
}

impl HttpGenerationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_settings(settings: &WidgetSettings) -> Self {
        Self::new(settings.endpoint.clone())
    }
}

/// Builds the chat panel against the configured relay endpoint and presets.
pub fn create_widget_dispatcher(settings: &WidgetSettings) -> InputDispatcher<HttpGenerationClient> {
    tracing::debug!(
        endpoint = %settings.endpoint,
        quick_questions = settings.quick_questions.len(),
        "Creating chat widget"
    );
    InputDispatcher::new(
        Arc::new(HttpGenerationClient::from_settings(settings)),
        settings.quick_questions.clone(),
    )
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn open(&self, query: &str) -> Result<ByteStream, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerationRequest::new(query))
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Err(TransportError::MissingBody);
        }

        tracing::debug!(status = status.as_u16(), endpoint = %self.endpoint, "Reply stream opened");

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TransportError::Body(e.to_string())));
        Ok(Box::pin(chunks))
    }
}
