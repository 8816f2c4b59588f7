//! Configuration for termbridge.
//!
//! Loaded from `~/.termbridge/config.toml`. Every field is optional:
//!
//! ```toml
//! # Session id used when the host has no saved sessions
//! default_session_id = "default"
//!
//! [cell]
//! width = 9.0
//! height = 18.0
//!
//! [timing]
//! resize_debounce_ms = 150
//! frame_interval_ms = 16
//!
//! [features]
//! bracketed_paste = true
//! focus_events = true
//! renderer_backend = "auto"
//!
//! [log]
//! level = "info"
//! # file = "/tmp/termbridge.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::grid::{NOMINAL_CELL_HEIGHT, NOMINAL_CELL_WIDTH};
use crate::core::session::DEFAULT_SESSION_ID;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session id used when nothing was saved
    pub default_session_id: String,
    /// Nominal cell metrics
    pub cell: CellConfig,
    /// Debounce and frame pacing
    pub timing: TimingConfig,
    /// Engine feature flags
    pub features: FeatureConfig,
    /// Log output
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_session_id: DEFAULT_SESSION_ID.to_string(),
            cell: CellConfig::default(),
            timing: TimingConfig::default(),
            features: FeatureConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Cell size in logical pixels at 1.0 DPR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            width: NOMINAL_CELL_WIDTH,
            height: NOMINAL_CELL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub resize_debounce_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 150,
            frame_interval_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub bracketed_paste: bool,
    pub focus_events: bool,
    pub renderer_backend: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            bracketed_paste: true,
            focus_events: true,
            renderer_backend: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Log file; defaults to `~/.termbridge/termbridge.log`
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load `~/.termbridge/config.toml`, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::get_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.timing.resize_debounce_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        // A zero interval would spin the coordinator loop
        Duration::from_millis(self.timing.frame_interval_ms.max(1))
    }
}

/// `~/.termbridge`
pub fn app_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".termbridge"))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
