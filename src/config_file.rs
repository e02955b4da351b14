//! Configuration file management
//!
//! This module handles loading and saving `config.toml`, which holds the
//! connection target and output paths. Database credentials are never
//! written here; they come from the environment only.

use crate::constants::{
    CONFIG_FILE_PERMISSIONS, CONFIG_PERMISSION_MASK_GROUP_OTHER, DEFAULT_DB_NAME, DEFAULT_HOST,
    DEFAULT_PORT,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Application configuration stored in config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Database host (default: localhost)
    pub host: String,
    /// Database port (default: 5432)
    pub port: u16,
    /// Database name (default: working_project_db)
    pub dbname: String,
    /// Where SELECT results are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_output_file: Option<PathBuf>,
    /// Where the table listing is written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dbname: DEFAULT_DB_NAME.to_string(),
            select_output_file: None,
            tables_output_file: None,
        }
    }
}

impl Config {
    /// Get the standard config file path
    ///
    /// - macOS: `~/Library/Application Support/pgprompt/config.toml`
    /// - Linux: `~/.config/pgprompt/config.toml`
    /// - Windows: `%APPDATA%\pgprompt\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Failed to determine config directory"))?
            .join("pgprompt");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from standard location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Load config from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Failed to read an existing file
    /// - TOML parsing fails
    /// - A value is out of range (port 0, empty host or dbname)
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        // Check file permissions (warning if too permissive)
        #[cfg(unix)]
        {
            let metadata = fs::metadata(path).context("Failed to read config file metadata")?;
            let mode = metadata.permissions().mode();

            if mode & CONFIG_PERMISSION_MASK_GROUP_OTHER != 0 {
                log::warn!(
                    "Config file has permissive permissions: {:o}. Should be 600 (user read/write only).",
                    mode & 0o777
                );
            }
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject values that can never connect.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host must not be empty");
        }
        if self.port == 0 {
            anyhow::bail!("port must be between 1 and 65535");
        }
        if !crate::utils::is_valid_identifier(&self.dbname) {
            anyhow::bail!(
                "dbname '{}' may only contain letters, digits and underscores",
                self.dbname
            );
        }
        Ok(())
    }

    /// Save config to standard location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// Save config to a specific path
    ///
    /// Creates the parent directory if it doesn't exist.
    /// Sets file permissions to 600 (user read/write only).
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        #[cfg(unix)]
        {
            let mut permissions = fs::metadata(path)?.permissions();
            permissions.set_mode(CONFIG_FILE_PERMISSIONS);
            fs::set_permissions(path, permissions)
                .context("Failed to set config file permissions")?;
        }

        log::info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}
