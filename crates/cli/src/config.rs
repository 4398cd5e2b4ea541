// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device configuration.
//!
//! Configuration is stored in `config.toml` inside the data directory and
//! includes:
//! - `node_id`: this device's tiebreaker in version stamps (generated at
//!   random and saved on first use)
//! - `[remote]`: the WebSocket remote store (local-only when absent)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::env;
use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "todosync";

/// Device configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Device identifier used in version stamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u32>,
    /// Remote store configuration (optional - if absent, runs in local-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

/// Remote store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL: `ws://...` or `wss://...`.
    pub url: String,
    /// Max time to wait for a reply to a write in milliseconds (default: 5000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Max time to wait for a connection in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Returns an error message if the URL is not a WebSocket URL.
    pub fn validate_url(&self) -> Option<String> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            return None;
        }
        Some(format!(
            "invalid remote URL '{}': must be ws:// or wss://",
            self.url
        ))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    /// Loads configuration from the data directory.
    ///
    /// A missing file yields the default configuration.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.as_ref().and_then(RemoteConfig::validate_url) {
            return Err(Error::Config(msg));
        }
        Ok(config)
    }

    /// Saves configuration to the data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// This device's node id. The first call on a device picks one at
    /// random and saves it, so devices sharing a data directory path still
    /// stamp distinct versions.
    pub fn ensure_node_id(&mut self, data_dir: &Path) -> Result<u32> {
        if let Some(node_id) = self.node_id {
            return Ok(node_id);
        }
        let node_id = rand::random::<u32>();
        self.node_id = Some(node_id);
        self.save(data_dir)?;
        info!("Assigned node id {} to {}", node_id, data_dir.display());
        Ok(node_id)
    }
}

/// Resolves the data directory: explicit flag, then `TODOSYNC_DIR`, then
/// the platform data directory.
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env::data_dir() {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .ok_or_else(|| Error::Config("cannot determine data directory\n  hint: pass --data-dir or set TODOSYNC_DIR".to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
