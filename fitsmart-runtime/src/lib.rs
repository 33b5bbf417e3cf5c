pub mod config;
pub mod defaults;
pub mod files;
pub mod gemini;
pub mod runtime_engine;
pub mod settings_store;

pub use config::{ConfigError, RuntimeConfig};
pub use gemini::GeminiCompletionProvider;
pub use runtime_engine::{build_orchestrator_from_config, load_runtime_config, open_settings};
pub use settings_store::SettingsStore;
