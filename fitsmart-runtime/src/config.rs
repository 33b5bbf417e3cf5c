use crate::defaults::*;
use fitsmart_core::config::AnalyzerSettings;
use fitsmart_core::prompt::ModelTier;
use fitsmart_providers::runtime::Timeouts;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing API key: set GEMINI_API_KEY (or API_KEY)")]
    MissingCredential,
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Fully resolved runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_key: String,
    pub base_url: String,
    pub fast_model: String,
    pub deep_model: String,
    pub timeouts: Timeouts,
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("fast_model", &self.fast_model)
            .field("deep_model", &self.deep_model)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl RuntimeConfig {
    pub fn from_env(settings: &AnalyzerSettings) -> Result<Self, ConfigError> {
        Self::resolve(settings, |name| std::env::var(name).ok())
    }

    /// Environment beats the settings file, which beats the built-in defaults.
    pub fn resolve<F>(settings: &AnalyzerSettings, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(ENV_API_KEY)
            .or_else(|| non_blank(ENV_API_KEY_FALLBACK))
            .ok_or(ConfigError::MissingCredential)?;

        let pick = |var: &str, file: &Option<String>, default: &str| {
            non_blank(var)
                .or_else(|| file.clone().filter(|v| !v.trim().is_empty()))
                .unwrap_or_else(|| default.to_string())
        };

        let request_secs = match non_blank(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: ENV_TIMEOUT_SECS,
                    value: raw,
                })?,
            None => settings
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        let connect_secs = settings
            .connect_timeout_secs
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: pick(ENV_BASE_URL, &settings.base_url, DEFAULT_BASE_URL),
            fast_model: pick(ENV_FAST_MODEL, &settings.fast_model, DEFAULT_FAST_MODEL),
            deep_model: pick(ENV_DEEP_MODEL, &settings.deep_model, DEFAULT_DEEP_MODEL),
            timeouts: Timeouts {
                connect: Duration::from_secs(connect_secs),
                request: Duration::from_secs(request_secs),
            },
        })
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Deep => &self.deep_model,
        }
    }
}
