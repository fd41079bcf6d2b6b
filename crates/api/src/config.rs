//! Server Configuration
//!
//! Typed configuration read from `LEARNPULSE_*` environment variables, e.g.
//! `LEARNPULSE_BIND_ADDR`, `LEARNPULSE_MODEL_REGISTRY_DIR`,
//! `LEARNPULSE_RELOAD_TOKEN`.

use serde::Deserialize;

/// Process-wide serving configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP surface.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// SQLite database URL for the metadata and feature stores.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Directory holding model artifact bundles; relative artifact paths
    /// resolve against it.
    #[serde(default = "default_model_registry_dir")]
    pub model_registry_dir: String,
    /// Feature schema version used when a request does not name one.
    #[serde(default = "default_feature_version")]
    pub feature_version: String,
    /// Token gating `/admin/reload`; unset disables the check.
    #[serde(default)]
    pub reload_token: Option<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_database_url() -> String {
    "sqlite://learnpulse.db?mode=rwc".to_string()
}

fn default_model_registry_dir() -> String {
    "./models".to_string()
}

fn default_feature_version() -> String {
    "1.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            model_registry_dir: default_model_registry_dir(),
            feature_version: default_feature_version(),
            reload_token: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("LEARNPULSE"))
            .build()?
            .try_deserialize()
    }
}
