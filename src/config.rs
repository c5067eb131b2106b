//! Configuration loader and validator
//!
//! Loads decoder and session settings from a TOML file (default
//! `configs/default.toml`). Every field has a default, so an empty file is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::axis::Deadzone;
use crate::controller::constants::{
    DEFAULT_DEADZONE, DEFAULT_READ_SIZE, REPORT_LEN, XBOX_VENDOR_ID, XBOX_WIRELESS_PRODUCT_ID,
};
use crate::dispatch::EventSet;
use crate::session::SessionSettings;

/// Upper bound for the idle back-off between empty reads
const MAX_IDLE_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid deadzone {0}: must be below the axis center (32767.5)")]
    InvalidDeadzone(u16),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Decoder and session settings
    #[serde(default)]
    pub settings: Settings,

    /// Which device the binary opens
    #[serde(default)]
    pub device: DeviceSettings,
}

/// Decoder and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Stick deadzone in raw axis units
    #[serde(default = "default_deadzone")]
    pub deadzone: u16,

    /// Dispatch a/b/lb/rb events as well as x/y
    #[serde(default)]
    pub dispatch_all_buttons: bool,

    /// Delay after each dispatched report (0 = none)
    #[serde(default)]
    pub poll_delay_ms: u64,

    /// Back-off when the device had no report ready
    #[serde(default = "default_idle_interval")]
    pub idle_interval_ms: u64,

    /// Log every decoded state
    #[serde(default = "default_true")]
    pub reporting_enabled: bool,

    /// How decoded states are logged
    #[serde(default)]
    pub report_format: ReportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            dispatch_all_buttons: false,
            poll_delay_ms: 0,
            idle_interval_ms: default_idle_interval(),
            reporting_enabled: true,
            report_format: ReportFormat::default(),
        }
    }
}

/// Rendering used for state reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Device selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,

    #[serde(default = "default_product_id")]
    pub product_id: u16,

    /// Bytes requested per read
    #[serde(default = "default_read_size")]
    pub read_size: usize,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            read_size: default_read_size(),
        }
    }
}

fn default_deadzone() -> u16 { DEFAULT_DEADZONE }
fn default_idle_interval() -> u64 { 1 }
fn default_true() -> bool { true }
fn default_vendor_id() -> u16 { XBOX_VENDOR_ID }
fn default_product_id() -> u16 { XBOX_WIRELESS_PRODUCT_ID }
fn default_read_size() -> usize { DEFAULT_READ_SIZE }

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading configuration from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml_str(&content)
    }

    /// Load default configuration from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;

        debug!("  - Deadzone: {}", config.settings.deadzone);
        debug!("  - Dispatch all buttons: {}", config.settings.dispatch_all_buttons);
        debug!(
            "  - Device: {:04x}:{:04x}",
            config.device.vendor_id, config.device.product_id
        );

        config.validate()?;
        info!("✓ Config validation passed");

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Deadzone::new(self.settings.deadzone)?;

        if self.settings.idle_interval_ms > MAX_IDLE_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "idle_interval_ms must be at most {}",
                MAX_IDLE_INTERVAL_MS
            )));
        }

        if self.device.read_size < REPORT_LEN {
            return Err(ConfigError::Invalid(format!(
                "read_size must be at least {} bytes",
                REPORT_LEN
            )));
        }

        Ok(())
    }

    /// Build the settings a session runs with
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        self.validate()?;

        let settings = &self.settings;
        Ok(SessionSettings {
            deadzone: Deadzone::new(settings.deadzone)?,
            events: if settings.dispatch_all_buttons {
                EventSet::all()
            } else {
                EventSet::LEGACY
            },
            read_size: self.device.read_size,
            poll_delay: (settings.poll_delay_ms > 0)
                .then(|| Duration::from_millis(settings.poll_delay_ms)),
            idle_interval: Duration::from_millis(settings.idle_interval_ms),
            reporting: settings.reporting_enabled.then_some(settings.report_format),
        })
    }
}
