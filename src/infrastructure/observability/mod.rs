mod init_tracing;
mod query_redaction;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use query_redaction::redact_query;
pub use tracing_config::TracingConfig;
