//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document-store URL
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Places-service URL for nearby-station discovery
    #[serde(default)]
    pub places_url: Option<String>,

    /// Persist the vehicle and fuel-purchase slices locally between runs
    #[serde(default = "default_true")]
    pub snapshot: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            places_url: None,
            snapshot: true,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carnet")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Set a key by its config-file name. Unknown keys are an error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server-url" | "server_url" => self.server_url = value.to_string(),
            "places-url" | "places_url" => {
                self.places_url = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "snapshot" => {
                self.snapshot = value
                    .parse()
                    .with_context(|| format!("'{value}' is not a boolean"))?;
            }
            _ => anyhow::bail!("unknown configuration key: {key}"),
        }
        Ok(())
    }
}

/// Resolve the server URL: the --server flag overrides the config file.
pub fn resolve_server(flag: Option<&str>, config: &Config) -> String {
    flag.map(String::from)
        .unwrap_or_else(|| config.server_url.clone())
}
