use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Optional, user-editable analyzer settings.
///
/// Every field falls back to a built-in default when unset. The API key is
/// never stored here; it only comes from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub base_url: Option<String>,
    pub fast_model: Option<String>,
    pub deep_model: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

pub const SETTING_KEYS: [&str; 5] = [
    "base_url",
    "fast_model",
    "deep_model",
    "connect_timeout_secs",
    "request_timeout_secs",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown setting: {0} (expected one of: {keys})", keys = SETTING_KEYS.join(", "))]
    UnknownKey(String),
    #[error("{key} must be a positive whole number of seconds, got {value:?}")]
    InvalidSeconds { key: String, value: String },
}

impl AnalyzerSettings {
    /// Current value of `key` as text, `None` when unset.
    pub fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(match key {
            "base_url" => self.base_url.clone(),
            "fast_model" => self.fast_model.clone(),
            "deep_model" => self.deep_model.clone(),
            "connect_timeout_secs" => self.connect_timeout_secs.map(|s| s.to_string()),
            "request_timeout_secs" => self.request_timeout_secs.map(|s| s.to_string()),
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        })
    }

    /// Sets `key`, or clears it when `value` is `None` or blank.
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), SettingsError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let seconds = |v: Option<&str>| -> Result<Option<u64>, SettingsError> {
            v.map(|raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| SettingsError::InvalidSeconds {
                        key: key.to_string(),
                        value: raw.to_string(),
                    })
            })
            .transpose()
        };

        match key {
            "base_url" => self.base_url = value.map(str::to_string),
            "fast_model" => self.fast_model = value.map(str::to_string),
            "deep_model" => self.deep_model = value.map(str::to_string),
            "connect_timeout_secs" => self.connect_timeout_secs = seconds(value)?,
            "request_timeout_secs" => self.request_timeout_secs = seconds(value)?,
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
