//! Configuration model loaded from external sources.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::member::{AuthenticatedUser, UserType};
use crate::domain::types::MemberId;

fn default_poll_interval_ms() -> u64 {
    crate::DEFAULT_POLL_INTERVAL_MS
}

fn default_request_timeout_secs() -> u64 {
    20
}

#[derive(Clone, Debug, Deserialize)]
/// Backend location and the identity the client acts as.
pub struct ClientConfig {
    pub api_base_url: String,
    pub access_token: String,
    pub member_id: MemberId,
    pub member_name: String,
    pub user_type: UserType,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Layers `config/default`, `config/{app_env}` and `APP_*` variables.
    pub fn from_sources(base_dir: &Path, app_env: &str) -> Result<Self, ConfigError> {
        let config_dir = base_dir.join("config");

        Config::builder()
            .add_source(File::from(config_dir.join("default")))
            .add_source(File::from(config_dir.join(app_env)).required(false))
            .add_source(Environment::with_prefix("APP").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn authenticated_user(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            access_token: self.access_token.clone(),
            member_id: self.member_id,
            name: self.member_name.clone(),
            user_type: self.user_type,
        }
    }
}
