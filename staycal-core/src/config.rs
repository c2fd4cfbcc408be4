//! Global staycal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FEED_DIR, DEFAULT_WINDOW_MONTHS};
use crate::error::{StayCalError, StayCalResult};

fn default_feed_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FEED_DIR)
}

fn default_window_months() -> u32 {
    DEFAULT_WINDOW_MONTHS
}

/// Global configuration at ~/.config/staycal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StayCalConfig {
    /// Directory holding the *.json day feed files
    #[serde(default = "default_feed_dir")]
    pub feed_dir: PathBuf,

    /// Months loaded by default
    #[serde(default = "default_window_months")]
    pub window_months: u32,

    /// Months before the current one included in the default window
    #[serde(default)]
    pub months_before: u32,
}

impl Default for StayCalConfig {
    fn default() -> Self {
        StayCalConfig {
            feed_dir: default_feed_dir(),
            window_months: DEFAULT_WINDOW_MONTHS,
            months_before: 0,
        }
    }
}

impl StayCalConfig {
    pub fn config_path() -> StayCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StayCalError::Config("Could not determine config directory".into()))?
            .join("staycal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/staycal/config.toml, creating a commented default on
    /// first use.
    pub fn load() -> StayCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> StayCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| StayCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StayCalError::Config(e.to_string()))
    }

    /// Feed directory with `~` expanded.
    pub fn feed_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.feed_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn save(&self, path: &Path) -> StayCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StayCalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| StayCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> StayCalResult<()> {
        let contents = format!(
            "\
# staycal configuration

# Where your day feed files (*.json) live:
# feed_dir = \"{}\"

# How many months to load:
# window_months = {}

# How many of those months come before the current one:
# months_before = 0
",
            DEFAULT_FEED_DIR, DEFAULT_WINDOW_MONTHS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StayCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StayCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
