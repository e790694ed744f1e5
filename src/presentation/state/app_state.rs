use std::sync::Arc;

use crate::application::ports::LlmClient;

#[derive(Clone)]
pub struct AppState {
    pub llm_client: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }
}
