//! Configuration system
//!
//! Registry switches and per-key pool presets, loadable from TOML or RON.
//!
//! ```toml
//! allow_create = true
//! allow_modify = false
//! report_on_teardown = true
//!
//! [pools.bullet]
//! initial_size = 64
//! max_size = 256
//! empty_behavior = "Grow"
//! max_empty_behavior = "ReuseOldest"
//! ```

use crate::pool::{EmptyBehavior, MaxEmptyBehavior};
use std::collections::BTreeMap;
use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text in the given format
    fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render configuration text in the given format
    fn render(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.render(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Sizing and policy for a single pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Instances created up front
    pub initial_size: usize,
    /// Capacity ceiling for growth; 0 means unbounded
    pub max_size: usize,
    /// What to do when a spawn finds no free instance
    pub empty_behavior: EmptyBehavior,
    /// What to do when growing would pass `max_size`
    pub max_empty_behavior: MaxEmptyBehavior,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 32,
            max_size: 64,
            empty_behavior: EmptyBehavior::Grow,
            max_empty_behavior: MaxEmptyBehavior::Fail,
        }
    }
}

impl PoolConfig {
    /// Create a pool configuration
    pub fn new(initial_size: usize, max_size: usize) -> Self {
        Self {
            initial_size,
            max_size,
            ..Self::default()
        }
    }

    /// Set both behaviors
    pub fn with_behaviors(mut self, empty: EmptyBehavior, max_empty: MaxEmptyBehavior) -> Self {
        self.empty_behavior = empty;
        self.max_empty_behavior = max_empty;
        self
    }

    /// An empty, unbounded pool with the given behaviors
    ///
    /// This is what `ensure_pool` creates before growing it.
    pub fn empty(empty: EmptyBehavior, max_empty: MaxEmptyBehavior) -> Self {
        Self::new(0, 0).with_behaviors(empty, max_empty)
    }
}

/// Registry-wide switches plus per-key pool presets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// `ensure_pool` may create pools for unknown keys
    pub allow_create: bool,
    /// `ensure_pool` may grow and re-tune existing pools
    pub allow_modify: bool,
    /// Log every pool's usage report on teardown
    pub report_on_teardown: bool,
    /// Presets used by `create_pool_preset`, keyed by template name
    pub pools: BTreeMap<String, PoolConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allow_create: true,
            allow_modify: true,
            report_on_teardown: false,
            pools: BTreeMap::new(),
        }
    }
}

impl Config for RegistryConfig {}

impl RegistryConfig {
    /// Add a preset for `key`
    pub fn with_pool(mut self, key: impl Into<String>, config: PoolConfig) -> Self {
        self.pools.insert(key.into(), config);
        self
    }

    /// The preset for `key`, or the default pool configuration
    pub fn pool_config(&self, key: &str) -> PoolConfig {
        self.pools.get(key).copied().unwrap_or_default()
    }
}
