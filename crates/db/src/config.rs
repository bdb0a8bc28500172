use sharedvisions_core::config::{parse_env_or, required_env, ConfigError};
use sharedvisions_core::limits::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Connection settings for the backend-as-a-service project.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co` (no trailing slash).
    pub url: String,
    /// Public anonymous key sent as `apikey` on every request.
    pub anon_key: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    /// Load from the environment.
    ///
    /// | Env Var                | Default    |
    /// |------------------------|------------|
    /// | `SUPABASE_URL`         | (required) |
    /// | `SUPABASE_ANON_KEY`    | (required) |
    /// | `REQUEST_TIMEOUT_SECS` | `30`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required_env("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            anon_key: required_env("SUPABASE_ANON_KEY")?,
            request_timeout_secs: parse_env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }

    /// Config pointing at an arbitrary base URL with default timeouts.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
