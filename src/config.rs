//! GuideConfig - Persisted Configuration
//!
//! Loaded from `typography-guide.toml` in the platform config directory.
//! Every field has a default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants::{
    ANNOUNCEMENT_CLEAR_MS, CHECKLIST_STORAGE_KEY, READY_ANNOUNCEMENT_MS, SLIDER_DEBOUNCE_MS,
    THEME_STORAGE_KEY,
};
use crate::error::{Error, Result};
use crate::storage::get_or_create_config_dir;

const CONFIG_FILE: &str = "typography-guide.toml";

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist to disk; otherwise state lives only for the session
    pub persist: bool,
    pub checklist_key: String,
    pub theme_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist: true,
            checklist_key: CHECKLIST_STORAGE_KEY.to_string(),
            theme_key: THEME_STORAGE_KEY.to_string(),
        }
    }
}

/// Timer settings, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub announcement_clear_ms: u64,
    /// Zero disables slider debouncing
    pub slider_debounce_ms: u64,
    pub ready_announcement_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            announcement_clear_ms: ANNOUNCEMENT_CLEAR_MS,
            slider_debounce_ms: SLIDER_DEBOUNCE_MS,
            ready_announcement_ms: READY_ANNOUNCEMENT_MS,
        }
    }
}

impl TimingConfig {
    pub fn announcement_clear(&self) -> Duration {
        Duration::from_millis(self.announcement_clear_ms)
    }

    pub fn slider_debounce(&self) -> Duration {
        Duration::from_millis(self.slider_debounce_ms)
    }

    pub fn ready_announcement(&self) -> Duration {
        Duration::from_millis(self.ready_announcement_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub storage: StorageConfig,
    pub timing: TimingConfig,
}

impl GuideConfig {
    /// Path of the config file, created empty if missing
    pub fn config_path() -> Result<PathBuf> {
        let path = get_or_create_config_dir()?.join(CONFIG_FILE);
        if !path.exists() {
            std::fs::write(&path, "")?;
        }
        Ok(path)
    }

    /// Load from the platform config directory
    pub fn try_load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        info!(path = ?path, "Loading config file");
        let value = std::fs::read_to_string(path)?;
        Self::from_toml_str(&value).inspect_err(|e| {
            error!(error = %e, path = ?path, "Failed to parse config file");
        })
    }

    /// Parse and validate TOML text; blank text yields the defaults
    pub fn from_toml_str(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.checklist_key.trim().is_empty() || self.storage.theme_key.trim().is_empty() {
            return Err(Error::Invalid {
                message: "storage keys must not be empty".to_string(),
            });
        }
        if self.storage.checklist_key == self.storage.theme_key {
            return Err(Error::Invalid {
                message: "checklist and theme storage keys must differ".to_string(),
            });
        }
        Ok(())
    }
}
