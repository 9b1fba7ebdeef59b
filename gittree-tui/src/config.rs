//! User configuration, read from `<config dir>/gittree/config.toml`.
//!
//! ```toml
//! [list]
//! show_age = true
//!
//! [ui]
//! show_age = true
//! highlight = "magenta"
//! ```

use directories::ProjectDirs;
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Options for the plain `list` output
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListConfig {
    /// Append the age of each branch tip
    pub show_age: bool,
}

/// Options for the interactive list
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub show_age: bool,
    /// Colour of the selected line: a name, `#rrggbb` or a 256-colour index
    pub highlight: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_age: true,
            highlight: "205".to_string(),
        }
    }
}

impl UiConfig {
    pub fn highlight_color(&self) -> Result<Color, ConfigError> {
        Color::from_str(&self.highlight)
            .map_err(|_| ConfigError::Invalid(format!("unknown highlight colour '{}'", self.highlight)))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub list: ListConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Default location of the configuration file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gittree").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing file yields the defaults; an explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            log::debug!("no configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.ui.highlight_color().map(|_| ())
    }
}
