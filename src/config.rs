//! Application configuration module
//!
//! Output preferences are stored with `confy`, which picks the OS-specific
//! configuration directory. Command-line flags override what is stored here.

use crate::constant::{APP_NAME, DEFAULT_COLUMN_WIDTH, DEFAULT_CONTEXT_LINES};
use crate::engine::Granularity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Load configuration, falling back to defaults when the stored file is unusable
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Using default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = confy::load_path(path)?;
        info!("Load config from {:?}", path);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        confy::store(APP_NAME, None, &self.settings)?;
        let path = Self::config_path()?;
        info!("Save config to {:?}", path);
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, &self.settings)?;
        info!("Save config to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }
}

/// How a comparison is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    SideBySide,
    Unified,
    Json,
    Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Unchanged lines shown around each hunk of the unified export
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Token size for inline highlighting of modified lines
    #[serde(default)]
    pub granularity: Granularity,

    /// Visible characters per side in side-by-side output
    #[serde(default = "default_column_width")]
    pub column_width: usize,

    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

fn default_column_width() -> usize {
    DEFAULT_COLUMN_WIDTH
}

fn default_color() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
            granularity: Granularity::default(),
            column_width: DEFAULT_COLUMN_WIDTH,
            color: true,
        }
    }
}
