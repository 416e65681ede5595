// Configuration File Support
//
// This module provides configuration file parsing for vmctl.
// Supports TOML format with environment variable overrides.
// Configuration files are loaded from XDG config directory: ~/.config/vmctl/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Control plane connection
    pub control_plane: ControlPlaneConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl LoggingConfig {
    /// Convert the level string to a tracing::Level
    pub fn parse_level(&self) -> Result<tracing::Level> {
        self.level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Control plane connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Base URL of the API server
    pub server: String,

    /// Namespace the virtual machines live in
    pub namespace: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:8001".to_string(),
            namespace: "default".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from the default XDG config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    /// If the config file does not exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// Environment overrides are applied whether or not the file exists.
    /// The result is not validated: callers apply command-line overrides
    /// first and then call [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file from {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file from {:?}", path))?;
            tracing::debug!("Loaded configuration from {:?}", path);
            config
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        Ok(config.apply_env_overrides())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/vmctl/config.toml` on Linux
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("io", "vmctl", "vmctl") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            // Fallback if XDG dirs cannot be determined
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config").join("vmctl").join("config.toml")
        }
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - VMCTL_LOG_LEVEL
    /// - VMCTL_LOG_FORMAT
    /// - VMCTL_SERVER
    /// - VMCTL_NAMESPACE
    /// - VMCTL_TOKEN
    /// - VMCTL_TIMEOUT_SECS
    fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("VMCTL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("VMCTL_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(server) = lookup("VMCTL_SERVER") {
            self.control_plane.server = server;
        }
        if let Some(namespace) = lookup("VMCTL_NAMESPACE") {
            self.control_plane.namespace = namespace;
        }
        if let Some(token) = lookup("VMCTL_TOKEN") {
            if !token.is_empty() {
                self.control_plane.token = Some(token);
            }
        }
        if let Some(timeout) = lookup("VMCTL_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                if timeout > 0 {
                    self.control_plane.timeout_secs = timeout;
                }
            }
        }

        self
    }

    /// Override connection settings from command-line flags
    pub fn with_overrides(mut self, server: Option<String>, namespace: Option<String>) -> Self {
        if let Some(server) = server {
            self.control_plane.server = server;
        }
        if let Some(namespace) = namespace {
            self.control_plane.namespace = namespace;
        }
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.logging.parse_level().is_err() {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        let server = &self.control_plane.server;
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            anyhow::bail!("Control plane server must be an http(s) URL, got '{}'", server);
        }
        if self.control_plane.namespace.trim().is_empty() {
            anyhow::bail!("Control plane namespace must not be empty");
        }
        if self.control_plane.timeout_secs == 0 {
            anyhow::bail!("Control plane timeout must be > 0");
        }

        Ok(())
    }

}
