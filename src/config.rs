//! Configuration types for asset-dl
//!
//! The configuration is read once from a JSON file, optionally overridden from
//! the environment and the command line, validated, and then shared read-only
//! for the rest of the run.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hard cap on concurrently outstanding transfers
pub const MAX_BATCH_SIZE: usize = 200;

/// Environment variable that overrides [`Config::base_url`]
pub const BASE_URL_ENV: &str = "ASSET_DL_BASE_URL";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "asset-dl.json";

/// Run configuration for [`AssetDownloader`](crate::AssetDownloader)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory that every logical path is resolved under (default: "./dat")
    #[serde(default = "default_save_root")]
    pub save_root: PathBuf,

    /// SQLite index listing every blob to fetch (default: "./meta")
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// CDN root that routes and hash shards are appended to
    #[serde(default)]
    pub base_url: String,

    /// Skip descriptors whose destination file already exists
    #[serde(default)]
    pub skip_existing: bool,

    /// Log a line when each transfer starts and finishes
    #[serde(default)]
    pub debug: bool,

    /// Per-transfer timeout in minutes (default: 5)
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,

    /// Transfers launched together and joined before the next group (default: 200)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_root: default_save_root(),
            index_path: default_index_path(),
            base_url: String::new(),
            skip_existing: false,
            debug: false,
            timeout_minutes: default_timeout_minutes(),
            batch_size: default_batch_size(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file without overrides or validation
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read config file {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON document without validating it
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replace `base_url` with the value of [`BASE_URL_ENV`] when it is set and non-empty
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(BASE_URL_ENV) {
            let value = value.trim();
            if !value.is_empty() {
                tracing::debug!(base_url = %value, "base URL overridden from environment");
                self.base_url = value.to_string();
            }
        }
    }

    /// Check every field and normalize `base_url` to end with a slash
    pub fn validate(&mut self) -> Result<()> {
        if self.save_root.as_os_str().is_empty() {
            return Err(Error::config("save_root", "save_root must not be empty"));
        }
        if self.index_path.as_os_str().is_empty() {
            return Err(Error::config("index_path", "index_path must not be empty"));
        }
        if self.timeout_minutes == 0 {
            return Err(Error::config(
                "timeout_minutes",
                "timeout_minutes must be at least 1",
            ));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::config(
                "batch_size",
                format!("batch_size must be between 1 and {MAX_BATCH_SIZE}"),
            ));
        }

        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(Error::config(
                "base_url",
                format!("base_url is required (set it in the config file or {BASE_URL_ENV})"),
            ));
        }
        let parsed = url::Url::parse(trimmed)
            .map_err(|e| Error::config("base_url", format!("invalid base_url '{trimmed}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(
                "base_url",
                format!("base_url must use http or https, got '{}'", parsed.scheme()),
            ));
        }
        self.base_url = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        Ok(())
    }

    /// Per-transfer timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }
}

fn default_save_root() -> PathBuf {
    PathBuf::from("./dat")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("./meta")
}

fn default_timeout_minutes() -> u64 {
    5
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}
