//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "BOOKINGS_CONFIG";

/// Environment variable overriding `auth.secret`
pub const JWT_SECRET_ENV: &str = "BOOKINGS_JWT_SECRET";

/// Complete server configuration
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```yaml
/// bind: 0.0.0.0:8080
/// prefix: /api
/// auth:
///   secret: change-me
///   leeway_secs: 30
/// references:
///   resolve_on_list: true
/// log:
///   level: debug
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server listens on
    pub bind: String,

    /// Path every resource router is nested under
    pub prefix: String,

    pub auth: AuthConfig,

    pub references: ReferencesConfig,

    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            prefix: "/api".to_string(),
            auth: AuthConfig::default(),
            references: ReferencesConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Bearer token verification settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub secret: String,

    /// Clock skew tolerated on `exp`, in seconds
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Also resolve references on list and paginated list reads
    pub resolve_on_list: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `BOOKINGS_CONFIG` if set, else defaults, then apply
    /// environment overrides
    pub fn from_env() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        Ok(config.with_secret_override(std::env::var(JWT_SECRET_ENV).ok()))
    }

    /// Replace `auth.secret` when an override is present and non-empty
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.auth.secret = secret;
        }
        self
    }
}
