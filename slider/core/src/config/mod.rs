//! TOML Configuration File Support
//!
//! Centralized configuration loading for the indicator, supporting a TOML
//! file at `~/.config/alert-slider/slider.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [controller]
//! dismiss_timeout_ms = 3000
//! queue_capacity = 100
//!
//! [ambient]
//! pulse_on_notification = true
//! ```
//!
//! # Environment Variables
//!
//! - `SLIDER_DISMISS_TIMEOUT_MS`: dismiss timeout in milliseconds
//! - `SLIDER_QUEUE_CAPACITY`: controller inbox capacity
//! - `SLIDER_PULSE_ON_NOTIFICATION`: `1`/`true` to pulse the ambient display

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::ControllerConfig;

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
// TOML Configuration Structures
// =============================================================================

/// Controller section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerToml {
    /// Dismiss timeout in milliseconds
    pub dismiss_timeout_ms: Option<u64>,

    /// Controller inbox capacity
    pub queue_capacity: Option<usize>,
}

/// Ambient display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientToml {
    /// Whether slider changes pulse the ambient display
    pub pulse_on_notification: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderToml {
    /// Controller configuration section
    pub controller: ControllerToml,

    /// Ambient display configuration section
    pub ambient: AmbientToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved indicator configuration
#[derive(Clone, Debug)]
pub struct SliderConfig {
    /// Controller timing and queueing
    pub controller: ControllerConfig,

    /// Initial value of the "pulse on notification" setting
    pub pulse_on_notification: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            pulse_on_notification: false,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SliderConfig {
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

    /// Check the resolved values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero timeout or a zero
    /// inbox capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.dismiss_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "dismiss timeout must be greater than zero".to_string(),
            ));
        }
        if self.controller.queue_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "queue capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/alert-slider/slider.toml` or
/// `~/.config/alert-slider/slider.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("alert-slider").join("slider.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resolved values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<SliderConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// resolved values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SliderConfig, ConfigError> {
    let mut config = SliderConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SliderToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
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

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut SliderConfig, toml: &SliderToml) {
    if let Some(ms) = toml.controller.dismiss_timeout_ms {
        config.controller.dismiss_timeout = Duration::from_millis(ms);
    }
    if let Some(capacity) = toml.controller.queue_capacity {
        config.controller.queue_capacity = capacity;
    }
    if let Some(enabled) = toml.ambient.pulse_on_notification {
        config.pulse_on_notification = enabled;
    }
}

fn apply_env_config(config: &mut SliderConfig) {
    if let Ok(timeout) = std::env::var("SLIDER_DISMISS_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.controller.dismiss_timeout = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(capacity) = std::env::var("SLIDER_QUEUE_CAPACITY") {
        if let Ok(n) = capacity.parse::<usize>() {
            config.controller.queue_capacity = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(enabled) = std::env::var("SLIDER_PULSE_ON_NOTIFICATION") {
        config.pulse_on_notification = enabled == "1" || enabled.to_lowercase() == "true";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Dismiss timeout override (milliseconds)
    pub dismiss_timeout_ms: Option<u64>,

    /// Inbox capacity override
    pub queue_capacity: Option<usize>,

    /// Pulse setting override
    pub pulse_on_notification: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dismiss timeout override
    #[must_use]
    pub fn with_dismiss_timeout_ms(mut self, ms: u64) -> Self {
        self.dismiss_timeout_ms = Some(ms);
        self
    }

    /// Set inbox capacity override
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Set pulse setting override
    #[must_use]
    pub fn with_pulse_on_notification(mut self, enabled: bool) -> Self {
        self.pulse_on_notification = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden values are invalid.
    pub fn apply(&self, config: &mut SliderConfig) -> Result<(), ConfigError> {
        if self.dismiss_timeout_ms.is_some()
            || self.queue_capacity.is_some()
            || self.pulse_on_notification.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ms) = self.dismiss_timeout_ms {
            config.controller.dismiss_timeout = Duration::from_millis(ms);
        }
        if let Some(capacity) = self.queue_capacity {
            config.controller.queue_capacity = capacity;
        }
        if let Some(enabled) = self.pulse_on_notification {
            config.pulse_on_notification = enabled;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
