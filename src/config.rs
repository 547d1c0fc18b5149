//! Application configuration management.
//!
//! This module handles loading and saving the client configuration,
//! which includes the API base URL and the last used username.
//!
//! Configuration is stored at `~/.config/salonkit/config.json`. The base URL
//! can be overridden with the `SALONKIT_API_URL` environment variable.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "salonkit";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend root when nothing else is configured (local development server)
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend root, without the `/api/` suffix
    pub api_base_url: String,
    /// Pre-filled into the login form by host applications
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let api_base_url = std::env::var("SALONKIT_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self {
            api_base_url,
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Remember the username of a successful login and persist it
    pub fn remember_username(&mut self, username: &str) -> Result<()> {
        self.last_username = Some(username.to_string());
        self.save()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serde_roundtrip() {
        let config = Config {
            api_base_url: "https://api.example.com".to_string(),
            last_username: Some("bella".to_string()),
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let restored: Config = serde_json::from_str(&json).expect("parse config");
        assert_eq!(restored.api_base_url, "https://api.example.com");
        assert_eq!(restored.last_username.as_deref(), Some("bella"));
    }
}
