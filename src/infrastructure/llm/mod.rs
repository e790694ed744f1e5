mod http_generation_client;
mod mock_llm_client;
mod streaming_client;

pub use http_generation_client::{HttpGenerationClient, create_widget_dispatcher};
pub use mock_llm_client::MockLlmClient;
pub use streaming_client::{StreamingLlmClient, create_streaming_llm_client};
