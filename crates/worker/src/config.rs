//! Worker settings on top of [`AppConfig`](sharedvisions_pipeline::AppConfig).
//!
//! | Variable                | Default     |
//! |-------------------------|-------------|
//! | `SV_EMAIL`              | (required)  |
//! | `SV_PASSWORD`           | (required)  |
//! | `SV_IMAGE_STYLE`        | `realistic` |
//! | `SV_POLL_INTERVAL_SECS` | `60`        |

use std::time::Duration;

use sharedvisions_core::config::{parse_env_or, required_env, ConfigError};
use sharedvisions_core::style::ImageStyle;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub email: String,
    pub password: String,
    pub style: ImageStyle,
    pub poll_interval: Duration,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let poll_secs: u64 = parse_env_or("SV_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SV_POLL_INTERVAL_SECS",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            email: required_env("SV_EMAIL")?,
            password: required_env("SV_PASSWORD")?,
            style: parse_env_or("SV_IMAGE_STYLE", ImageStyle::Realistic)?,
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}
