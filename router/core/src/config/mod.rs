//! TOML Configuration File Support
//!
//! Centralized configuration loading for routers, backed by an optional TOML
//! file at `~/.config/adaptive-router/router.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [router]
//! strategy = "adaptive"   # adaptive | sharded | round_robin
//! window_size = 10
//! ```
//!
//! # Environment Variables
//!
//! - `ROUTER_STRATEGY`: strategy name
//! - `ROUTER_WINDOW_SIZE`: observations kept per endpoint (positive integer)

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Window size used when nothing else is configured
pub const DEFAULT_WINDOW_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => panic!("default window size must be positive"),
};

const ENV_STRATEGY: &str = "ROUTER_STRATEGY";
const ENV_WINDOW_SIZE: &str = "ROUTER_WINDOW_SIZE";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// Which routing strategy to build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Dominance ranking over history, single reader/writer lock
    #[default]
    Adaptive,
    /// Dominance ranking over history, per-shard locks
    Sharded,
    /// Cycle through candidates, ignore history
    RoundRobin,
}

impl Strategy {
    /// Configuration name of this strategy
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Sharded => "sharded",
            Self::RoundRobin => "round_robin",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "sharded" => Ok(Self::Sharded),
            "round_robin" | "round-robin" | "roundrobin" => Ok(Self::RoundRobin),
            other => Err(ConfigError::ValidationError(format!(
                "unknown strategy '{other}' (expected adaptive, sharded or round_robin)"
            ))),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Router section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterToml {
    /// Strategy name
    pub strategy: Option<Strategy>,

    /// Observations kept per endpoint
    pub window_size: Option<usize>,
}

/// Root TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfigToml {
    /// Router settings
    pub router: RouterToml,
}

// =============================================================================
// Unified Configuration
// =============================================================================

/// Fully resolved router configuration
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Strategy to build
    pub strategy: Strategy,

    /// Observations kept per endpoint, fixed for the router's lifetime
    pub window_size: NonZeroUsize,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            window_size: DEFAULT_WINDOW_SIZE,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Use `strategy` instead of the current one
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use `window_size` instead of the current one
    #[must_use]
    pub fn with_window_size(mut self, window_size: NonZeroUsize) -> Self {
        self.window_size = window_size;
        self
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/adaptive-router/router.toml` or
/// `~/.config/adaptive-router/router.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("adaptive-router").join("router.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// any source supplies an invalid value. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<RouterConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if any source supplies an invalid value.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<RouterConfig, ConfigError> {
    let mut config = RouterConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: RouterConfigToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config)?;

    tracing::debug!(
        strategy = %config.strategy,
        window_size = config.window_size.get(),
        source = %config.source,
        "Resolved router configuration"
    );

    Ok(config)
}

fn parse_window_size(value: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(value)
        .ok_or_else(|| ConfigError::ValidationError("window_size must be positive".to_string()))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut RouterConfig, toml: &RouterConfigToml) -> Result<(), ConfigError> {
    if let Some(strategy) = toml.router.strategy {
        config.strategy = strategy;
    }
    if let Some(window) = toml.router.window_size {
        config.window_size = parse_window_size(window)?;
    }
    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut RouterConfig) -> Result<(), ConfigError> {
    if let Ok(strategy) = std::env::var(ENV_STRATEGY) {
        config.strategy = strategy.parse()?;
        config.source = ConfigSource::Env;
    }
    if let Ok(window) = std::env::var(ENV_WINDOW_SIZE) {
        let window = window.trim().parse::<usize>().map_err(|e| {
            ConfigError::ValidationError(format!("{ENV_WINDOW_SIZE}='{window}': {e}"))
        })?;
        config.window_size = parse_window_size(window)?;
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values supplied on the command line, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Strategy override
    pub strategy: Option<Strategy>,

    /// Window size override
    pub window_size: Option<NonZeroUsize>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Override the window size
    #[must_use]
    pub fn with_window_size(mut self, window_size: NonZeroUsize) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Apply overrides to a loaded configuration
    pub fn apply(&self, config: &mut RouterConfig) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
            config.source = ConfigSource::Cli;
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
            config.source = ConfigSource::Cli;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
