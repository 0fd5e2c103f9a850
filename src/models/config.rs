//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    pub secret: String,
    /// Lifetime of a sign-in token, in hours.
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    /// Administrator created at startup while no profile exists.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Cookie signing and encryption keys are derived from at least this many
/// bytes of secret.
pub const MIN_SECRET_LEN: usize = 64;

fn default_session_hours() -> i64 {
    12
}

impl ServerConfig {
    /// Loads `config/default.yaml`, then `config/{APP_ENV}.yaml` when present,
    /// then `APP_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()
            .and_then(|config| config.validated())
    }

    /// Rejects values the server cannot start with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Message(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.secret.len()
            )));
        }
        if self.session_hours <= 0 {
            return Err(ConfigError::Message(
                "session_hours must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}
