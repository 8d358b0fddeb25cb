use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use lostfound_common::Thresholds;

use crate::error::{LostFoundError, Result};

/// Environment variable overriding the configured server URL.
pub const SERVER_URL_ENV: &str = "LF_SERVER_URL";

/// Paths of the backend endpoints, relative to the server URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub lost: String,
    pub found: String,
    pub history: String,
    pub reset: String,
    pub health: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            lost: "/api/lost".to_string(),
            found: "/api/found".to_string(),
            history: "/api/history".to_string(),
            reset: "/api/reset".to_string(),
            health: "/api/health".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            endpoints: Endpoints::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.lostfound.json)
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".lostfound.json"))
            .ok_or_else(|| LostFoundError::Config("could not find home directory".to_string()))
    }

    /// Load configuration from the default location, creating it with
    /// defaults if missing, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path()?)?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            config.apply_server_override(&url)?;
        }
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there first if the
    /// file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            Config::default().save_to(path)?;
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults with a warning on failure.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn apply_server_override(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(());
        }
        validate_server_url(url)?;
        tracing::debug!(%url, "server URL overridden from {}", SERVER_URL_ENV);
        self.server_url = url.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_server_url(&self.server_url)?;
        self.thresholds
            .validate()
            .map_err(|e| LostFoundError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Save the configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Point the client at a different server and save
    pub fn set_server_url(&mut self, server_url: &str) -> Result<()> {
        validate_server_url(server_url)?;
        self.server_url = server_url.trim_end_matches('/').to_string();
        self.save()
    }
}

fn validate_server_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(LostFoundError::Config(format!(
            "server URL must start with http:// or https://, got {url:?}"
        )))
    }
}
