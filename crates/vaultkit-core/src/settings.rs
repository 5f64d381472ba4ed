//! Client settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. Secrets never
//! go here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CryptoError, Result};

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// TLS trust configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TlsSettings {
    /// Additional PEM bundles trusted on top of the bundled root store
    #[serde(default)]
    pub extra_ca_files: Vec<PathBuf>,
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Tracing filter directive (e.g. "info", "vaultkit_tls=debug")
    pub log_filter: String,
    /// TLS configuration
    #[serde(default)]
    pub tls: TlsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            tls: TlsSettings::default(),
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(config_dir: &Path) -> Self {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_default();

        Self {
            settings_file,
            settings,
        }
    }

    /// Platform config directory for vaultkit
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "vaultkit", "vaultkit")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                CryptoError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                ))
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save().await
    }

    /// Get TLS settings
    pub fn get_tls(&self) -> &TlsSettings {
        &self.settings.tls
    }

    /// Update TLS settings and save
    pub async fn update_tls(&mut self, tls: TlsSettings) -> Result<()> {
        self.settings.tls = tls;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }
}
