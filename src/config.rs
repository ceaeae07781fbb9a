use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PoolError, Result};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolConfig {
    #[serde(default)]
    pub pool: PoolSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolSection {
    /// Identity allowed to inject rewards
    #[serde(default = "default_owner")]
    pub owner: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_owner() -> String {
    "team".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            owner: default_owner(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool: PoolSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PoolConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: PoolConfig =
            toml::from_str(s).map_err(|e| PoolError::Config(e.to_string()))?;
        if config.pool.owner.trim().is_empty() {
            return Err(PoolError::Config("pool.owner must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| PoolError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&s)?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found at '{}'. Using defaults.", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PoolError::Config(e.to_string()))
    }
}
