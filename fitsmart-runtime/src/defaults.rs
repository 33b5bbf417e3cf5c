pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_FAST_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_DEEP_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "API_KEY";
pub const ENV_BASE_URL: &str = "FITSMART_BASE_URL";
pub const ENV_FAST_MODEL: &str = "FITSMART_FAST_MODEL";
pub const ENV_DEEP_MODEL: &str = "FITSMART_DEEP_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "FITSMART_TIMEOUT_SECS";

/// Settings file used when `--settings` is not given, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "fitsmart.json";
