//! Application configuration
//!
//! Loaded from TOML. Lookup order: an explicit path, then `KHATA_CONFIG`, then
//! `<data_local_dir>/khata/config.toml`, then built-in defaults. Missing files fall
//! back to defaults; a file that exists but fails to parse is an error.
//!
//! ```toml
//! currency_symbol = "₹"
//! display_utc_offset_minutes = 330
//! default_categories = ["🍱 Food", "🏠 Rent", "📦 Other"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::InsightConfig;
use crate::models::DEFAULT_CATEGORIES;
use crate::normalize::{display_offset, DEFAULT_UTC_OFFSET_MINUTES};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "KHATA_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KhataConfig {
    /// Prefix for every formatted amount
    pub currency_symbol: String,
    /// Minutes east of UTC used for month buckets and displayed timestamps
    pub display_utc_offset_minutes: i32,
    /// Categories seeded into each new book
    pub default_categories: Vec<String>,
}

impl Default for KhataConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            display_utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            default_categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl KhataConfig {
    /// Load using the standard lookup order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit
            .map(Path::to_path_buf)
            .or(env_path)
            .or_else(default_config_path);

        match path {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Read and parse one file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.default_categories.is_empty() {
            return Err(Error::Config(
                "default_categories must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn display_offset(&self) -> FixedOffset {
        display_offset(self.display_utc_offset_minutes)
    }

    /// Formatting settings for the insight engine
    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig {
            currency_symbol: self.currency_symbol.clone(),
            display_offset: self.display_offset(),
        }
    }
}

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("khata").join("config.toml"))
}
