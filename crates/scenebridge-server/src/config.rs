//! TOML configuration for the bridge server and demo workspace host.
//!
//! Every field carries a `#[serde(default = ...)]` fallback so the bridge
//! works on first run with no config file at all, and keeps working when an
//! older file is missing newer fields.
//!
//! ```toml
//! [server]
//! port = 9876
//! bind_address = "127.0.0.1"
//! log_level = "info"
//!
//! [workspace]
//! project_root = "./project"
//! max_captured_errors = 100
//! ```

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::server::DEFAULT_PORT;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// TCP port the bridge listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Interface to bind.  Loopback by default: the bridge exposes full
    /// editor control and is meant for a co-located agent process.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// `tracing` filter used when `RUST_LOG` is not set:
    /// `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Demo workspace host settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Directory the script/filesystem commands operate in.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
    /// Cap on the captured-runtime-error ring; the oldest entry is evicted
    /// once the cap is reached.
    #[serde(default = "default_max_captured_errors")]
    pub max_captured_errors: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            log_level: default_log_level(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            max_captured_errors: default_max_captured_errors(),
        }
    }
}

impl BridgeConfig {
    /// Loads the config from `path`, or returns defaults when the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes the config to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on serialization or file write failure.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_project_root() -> PathBuf {
    PathBuf::from("./project")
}

fn default_max_captured_errors() -> usize {
    100
}
