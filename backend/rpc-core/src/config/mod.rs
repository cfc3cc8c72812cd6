//! Server configuration persisted as `config.json`.

use crate::error::ConfigError;
use crate::{DEFAULT_HOST, DEFAULT_PORT};

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::net::IpAddr;
use std::panic::Location;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const LOCALHOST: &str = "localhost";

/// Lifetime of the reference registry behind each connection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryScope {
    /// Every connection owns its handles; they vanish when it closes.
    #[default]
    Connection,
    /// One registry shared by every connection for the life of the server.
    Process,
}

impl Display for RegistryScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            RegistryScope::Connection => f.write_str("connection"),
            RegistryScope::Process => f.write_str("process"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_host")]
    pub host: String,

    /// `0` binds an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_loopback_only")]
    pub loopback_only: bool,

    #[serde(default)]
    pub registry_scope: RegistryScope,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            host: default_host(),
            port: default_port(),
            loopback_only: default_loopback_only(),
            registry_scope: RegistryScope::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_loopback_only() -> bool {
    true
}

impl ServerConfig {
    /// `host:port` as passed to the listener.
    pub fn bind_address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(address)) => format!("[{address}]:{}", self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }

    /// Load config from `{config_dir}/config.json`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read, parsed or validated is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::Read {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ServerConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {e}");
            ConfigError::Parse {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to `{config_dir}/config.json` via temp file and rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, the write or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown version or a host
    /// that is neither `localhost` nor an IP address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        if self.host.is_empty() {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: "host cannot be empty string".to_string(),
            });
        }

        if self.host != LOCALHOST && self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid host: {} (expected localhost or an IP address)",
                    self.host
                ),
            });
        }

        Ok(())
    }
}
