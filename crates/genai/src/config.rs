use sharedvisions_core::config::{env_or, parse_env_or, required_env, ConfigError};
use sharedvisions_core::limits::DEFAULT_GENERATION_TIMEOUT_SECS;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGEN_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/imagen-3.0-generate-002:predict";

/// Credentials and endpoints for the generative API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Text model name, e.g. `gemini-2.0-flash-exp`.
    pub text_model: String,
    /// Base URL for `models/{model}:generateContent`.
    pub api_base: String,
    /// Full URL of the image prediction endpoint.
    pub imagen_endpoint: String,
    pub request_timeout_secs: u64,
}

impl GeminiConfig {
    /// Load from environment variables.
    ///
    /// | Env var                | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `GEMINI_API_KEY`       | required                                 |
    /// | `GEMINI_TEXT_MODEL`    | `gemini-2.0-flash-exp`                   |
    /// | `GEMINI_API_BASE`      | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `IMAGEN_ENDPOINT`      | `.../imagen-3.0-generate-002:predict`    |
    /// | `GEMINI_TIMEOUT_SECS`  | `120`                                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required_env("GEMINI_API_KEY")?,
            text_model: env_or("GEMINI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            imagen_endpoint: env_or("IMAGEN_ENDPOINT", DEFAULT_IMAGEN_ENDPOINT),
            request_timeout_secs: parse_env_or("GEMINI_TIMEOUT_SECS", DEFAULT_GENERATION_TIMEOUT_SECS)?,
        })
    }

    /// Defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            imagen_endpoint: DEFAULT_IMAGEN_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}
