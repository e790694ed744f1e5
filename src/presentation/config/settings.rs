use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

/// Layered settings: `appsettings.<env>` file (optional), then `APP_*`
/// variables using `__` between sections, e.g. `APP_LLM__API_KEY`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub logging: LoggingSettings,
    pub scaffold: ScaffoldConfig,
    pub widget: WidgetSettings,
}

impl Settings {
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub api_key: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: None,
            azure_endpoint: None,
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            system_prompt: "You are an Amex India credit card assistant. Reply concisely."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,concierge=debug,tower_http=debug".to_string(),
            enable_json: false,
        }
    }
}

/// Serves canned replies instead of calling a real model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_response_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub endpoint: String,
    pub quick_questions: Vec<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/generate".to_string(),
            quick_questions: vec![
                "What credit cards do you offer?".to_string(),
                "How do I apply for a business account?".to_string(),
                "What are your current interest rates?".to_string(),
                "How can I track my rewards points?".to_string(),
            ],
        }
    }
}
