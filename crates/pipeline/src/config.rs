use sharedvisions_core::config::ConfigError;
use sharedvisions_db::BackendConfig;
use sharedvisions_genai::GeminiConfig;

/// Everything needed to talk to both remote services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load both sub-configs from the environment. See
    /// [`BackendConfig::from_env`] and [`GeminiConfig::from_env`] for the
    /// variables read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: BackendConfig::from_env()?,
            gemini: GeminiConfig::from_env()?,
        })
    }
}
