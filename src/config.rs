use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bind: Option<String>,
    pub languages: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config =
                toml::from_str(&content).wrap_err_with(|| format!("invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}
