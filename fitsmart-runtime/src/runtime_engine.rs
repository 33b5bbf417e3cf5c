use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use fitsmart_engine::orchestrator::Orchestrator;
use fitsmart_engine::traits::CompletionProvider;

use crate::config::RuntimeConfig;
use crate::defaults::DEFAULT_SETTINGS_FILE;
use crate::gemini::GeminiCompletionProvider;
use crate::settings_store::SettingsStore;

/// The explicit settings file, or `fitsmart.json` in the working directory.
pub fn open_settings(settings_path: Option<&Path>) -> SettingsStore {
    SettingsStore::at_path(settings_path.unwrap_or(Path::new(DEFAULT_SETTINGS_FILE)))
}

/// Resolves configuration from the settings file (if present) and the process
/// environment. A missing credential fails here, before any session starts.
pub fn load_runtime_config(settings_path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    let settings = open_settings(settings_path).load_or_default()?;
    let cfg = RuntimeConfig::from_env(&settings).context("resolve runtime configuration")?;
    log::debug!("runtime config: {cfg:?}");
    Ok(cfg)
}

/// Build a runnable orchestrator backed by the Gemini endpoint.
pub fn build_orchestrator_from_config(cfg: RuntimeConfig) -> Orchestrator {
    let provider: Arc<dyn CompletionProvider> = Arc::new(GeminiCompletionProvider::new(cfg));
    Orchestrator::new(provider)
}
