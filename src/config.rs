//! Client configuration.
//!
//! Configuration is stored in `.helpdesk/config.yaml` and includes:
//! - The REST root of the helpdesk host
//! - Credentials for write operations (session nonce or application password)
//! - The request timeout
//!
//! Every value can be overridden from the environment.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HelpdeskError, Result};
use crate::remote::Credential;
use crate::remote::rest::parse_base_url;
use crate::types::HELPDESK_DIR;

pub const URL_ENV: &str = "HELPDESK_URL";
pub const NONCE_ENV: &str = "HELPDESK_NONCE";
pub const USERNAME_ENV: &str = "HELPDESK_USERNAME";
pub const APP_PASSWORD_ENV: &str = "HELPDESK_APP_PASSWORD";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "url",
    "auth.nonce",
    "auth.username",
    "auth.app_password",
    "timeout_secs",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST root of the helpdesk host, e.g. `https://example.com/wp-json/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Authentication for write operations
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            auth: AuthConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_password: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.nonce.is_none() && self.username.is_none() && self.app_password.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("nonce", &self.nonce.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field(
                "app_password",
                &self.app_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Read a non-empty environment variable
fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(HELPDESK_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            HelpdeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;

        // Credentials live here; owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// REST root from environment or config file
    pub fn url(&self) -> Option<String> {
        env_value(URL_ENV).or_else(|| self.url.clone())
    }

    pub fn nonce(&self) -> Option<String> {
        env_value(NONCE_ENV).or_else(|| self.auth.nonce.clone())
    }

    pub fn username(&self) -> Option<String> {
        env_value(USERNAME_ENV).or_else(|| self.auth.username.clone())
    }

    pub fn app_password(&self) -> Option<String> {
        env_value(APP_PASSWORD_ENV).or_else(|| self.auth.app_password.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Credential for write operations.
    ///
    /// An application password (username + password) wins over a nonce;
    /// with neither configured requests are sent anonymously.
    pub fn credential(&self) -> Credential {
        if let (Some(username), Some(password)) = (self.username(), self.app_password()) {
            return Credential::application_password(username, password);
        }
        match self.nonce() {
            Some(nonce) => Credential::nonce(nonce),
            None => Credential::Anonymous,
        }
    }

    /// Set a value by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "url" => {
                parse_base_url(value)?;
                self.url = Some(value.to_string());
            }
            "auth.nonce" => self.auth.nonce = Some(value.to_string()),
            "auth.username" => self.auth.username = Some(value.to_string()),
            "auth.app_password" => self.auth.app_password = Some(value.to_string()),
            "timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    HelpdeskError::Config(format!(
                        "invalid timeout '{value}', expected a whole number of seconds"
                    ))
                })?;
                if secs == 0 {
                    return Err(HelpdeskError::Config(
                        "timeout_secs must be at least 1".to_string(),
                    ));
                }
                self.timeout_secs = secs;
            }
            _ => {
                return Err(HelpdeskError::Config(format!(
                    "unknown config key '{key}'. Valid keys: {}",
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}
