mod generation_client;
mod llm_client;

pub use generation_client::{ByteStream, GenerationClient, GenerationRequest, TransportError};
pub use llm_client::{LlmClient, LlmClientError, LlmTokenStream};
