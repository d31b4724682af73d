//! Configuration loading
//!
//! Config is resolved in layers:
//! 1. Explicit path (`--config` flag or `TALLY_CONFIG`)
//! 2. User override (~/.config/tally/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! A missing explicit path is an error; a missing user override is not.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::categorize::{CategoryRule, Classifier};
use crate::error::{Error, Result};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "TALLY_CONFIG";

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Fallback budget seed when a config file leaves it out
pub const DEFAULT_MONTHLY_BUDGET: f64 = 10000.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value the "monthly_budget" setting is seeded with
    pub default_budget: f64,
    /// Ordered keyword table for auto-categorization
    pub category_rules: Vec<CategoryRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_budget: DEFAULT_MONTHLY_BUDGET,
            category_rules: Classifier::default_rules(),
        }
    }
}

impl Config {
    /// Load using the layered resolution described in the module docs
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("Using embedded default config");
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::InvalidData(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if !config.default_budget.is_finite() || config.default_budget < 0.0 {
            return Err(Error::InvalidAmount(format!(
                "default_budget {} must be a non-negative number",
                config.default_budget
            )));
        }
        Ok(config)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.category_rules.clone())
    }
}

/// User override location (~/.config/tally/config.toml on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}
