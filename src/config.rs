//! Configuration module for the access gate.
//!
//! Loads configuration from YAML files and environment variables.
//! The result is read-only for the lifetime of the process.

use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Raw master credential. Applied verbatim, bypassing typed env parsing.
const MASTER_TOKEN_ENV: &str = "GATE_AUTH__MASTER_TOKEN";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Process-wide master credential.
    #[serde(default)]
    pub master_token: String,
    /// Path prefixes that require `MASTER-TOKEN`.
    #[serde(default)]
    pub master_paths: Vec<String>,
    /// Path prefixes that require a per-client `ACCESS-TOKEN`.
    #[serde(default)]
    pub access_token_paths: Vec<String>,
    /// Clients known to the static credential directory.
    #[serde(default)]
    pub clients: Vec<ConfiguredClient>,
}

/// Client credential entry from config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredClient {
    /// Identifier sent as the `client_id` parameter.
    pub client_id: String,
    /// Expected `ACCESS-TOKEN` value for this client.
    pub access_token: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GATE_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    ///
    /// `GATE_AUTH__MASTER_TOKEN` is taken as-is: typed parsing would turn
    /// `0123` into `123` or `TRUE` into `true`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with GATE_ prefix
            .add_source(
                Environment::with_prefix("GATE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.master_paths")
                    .with_list_parse_key("auth.access_token_paths")
                    .try_parsing(true),
            );

        if let Ok(raw) = std::env::var(MASTER_TOKEN_ENV) {
            builder = builder.set_override("auth.master_token", raw)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}

impl AuthConfig {
    /// Reject configurations the gate cannot enforce safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.master_paths.is_empty() && self.master_token.is_empty() {
            return Err(ConfigError::Message(
                "auth.master_token must be set when auth.master_paths is not empty".to_string(),
            ));
        }

        for client in &self.clients {
            if client.client_id.is_empty() {
                return Err(ConfigError::Message(
                    "auth.clients entry with empty client_id".to_string(),
                ));
            }
            if client.access_token.is_empty() {
                return Err(ConfigError::Message(format!(
                    "auth.clients entry '{}' has an empty access_token",
                    client.client_id
                )));
            }
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
