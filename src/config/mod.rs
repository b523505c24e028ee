//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/repairhub/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repair backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Default values for the ordering flow
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Geolocation settings
    #[serde(default)]
    pub location: LocationConfig,

    /// App server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Repair backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the repair backend
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

/// Default values for the ordering flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default urgency level (standard, faster, urgent)
    #[serde(default = "default_urgency")]
    pub urgency: String,
}

/// Geolocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, center listing acquires the user's position by default
    #[serde(default)]
    pub default_here: bool,

    /// Upper bound on a one-shot position acquisition, in seconds
    #[serde(default = "default_position_timeout")]
    pub timeout_secs: u64,
}

/// App server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_backend_timeout() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}
fn default_urgency() -> String {
    DEFAULT_URGENCY.to_string()
}
fn default_position_timeout() -> u64 {
    DEFAULT_POSITION_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            defaults: DefaultsConfig::default(),
            location: LocationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            urgency: default_urgency(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_here: false,
            timeout_secs: default_position_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load config from disk, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(Self::config_path()?, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a config value as a string by dotted key
    pub fn get(&self, key: &str) -> Option<String> {
        match key.split('.').collect::<Vec<_>>()[..] {
            ["backend", "base_url"] => Some(self.backend.base_url.clone()),
            ["backend", "timeout_secs"] => Some(self.backend.timeout_secs.to_string()),
            ["defaults", "urgency"] => Some(self.defaults.urgency.clone()),
            ["location", "default_here"] => Some(self.location.default_here.to_string()),
            ["location", "timeout_secs"] => Some(self.location.timeout_secs.to_string()),
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            _ => None,
        }
    }

    /// Set a config value from a string by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.split('.').collect::<Vec<_>>()[..] {
            ["backend", "base_url"] => {
                self.backend.base_url = value.trim_end_matches('/').to_string();
            }

            ["backend", "timeout_secs"] => {
                self.backend.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout: {}", value)))?;
            }

            ["defaults", "urgency"] => {
                value
                    .parse::<crate::pricing::UrgencyLevel>()
                    .map_err(Error::Config)?;
                self.defaults.urgency = value.to_lowercase();
            }

            ["location", "default_here"] => {
                self.location.default_here = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid boolean: {}", value)))?;
            }

            ["location", "timeout_secs"] => {
                self.location.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout: {}", value)))?;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }

            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port: {}", value)))?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "backend.base_url",
            "backend.timeout_secs",
            "defaults.urgency",
            "location.default_here",
            "location.timeout_secs",
            "server.host",
            "server.port",
        ]
    }

    /// Get app server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Default urgency level parsed from config
    pub fn default_urgency(&self) -> crate::pricing::UrgencyLevel {
        self.defaults.urgency.parse().unwrap_or_default()
    }
}
