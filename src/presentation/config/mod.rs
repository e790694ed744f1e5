mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LlmSettings, LoggingSettings, ScaffoldConfig, ServerSettings, Settings, WidgetSettings,
};
