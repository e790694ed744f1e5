use std::sync::Arc;

use tokio::net::TcpListener;

use concierge::application::ports::LlmClient;
use concierge::infrastructure::llm::{MockLlmClient, create_streaming_llm_client};
use concierge::infrastructure::observability::{TracingConfig, init_tracing};
use concierge::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::from_settings(
        &settings.logging,
        environment.as_str(),
    ));

    let llm_client: Arc<dyn LlmClient> = if settings.scaffold.enabled {
        tracing::warn!("Scaffold mode enabled, replies are canned");
        Arc::new(MockLlmClient::from_config(&settings.scaffold))
    } else {
        Arc::new(create_streaming_llm_client(&settings.llm)?)
    };

    let router = create_router(AppState::new(llm_client));

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        provider = %settings.llm.provider,
        model = %settings.llm.chat_model,
        "Relay listening on /generate"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
