//! Configuration management for j.
//!
//! Loads configuration from ${J_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ignore::IgnoreFilter;
use crate::persistence::{HistoryFile, write_atomic};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

fn default_config_template() -> &'static str {
    r#"# j configuration

# Where the directory history is stored (default: $J_HOME/data.json).
# history_file = "/path/to/data.json"

# Ignore patterns, one shell glob per line (default: $J_HOME/ignore).
# ignore_file = "/path/to/ignore"

[clean]
# Drop entries not visited for this many days when running `j clean`.
# max_age_days = 90

[selector]
# Show the key help line above the list.
show_instructions = true
# Display paths under $HOME as ~/...
abbreviate_home = true
"#
}

pub mod paths {
    //! Path resolution for j configuration and data files.
    //!
    //! J_HOME resolution order:
    //! 1. J_HOME environment variable (if set)
    //! 2. ~/.j (default)

    use std::path::PathBuf;

    /// Returns the j home directory.
    pub fn jump_home() -> PathBuf {
        if let Ok(home) = std::env::var("J_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(|| PathBuf::from(".j"), |h| h.join(".j"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        jump_home().join("config.toml")
    }

    /// Returns the default path of the history file.
    pub fn history_path() -> PathBuf {
        jump_home().join("data.json")
    }

    /// Returns the default path of the ignore-pattern file.
    pub fn ignore_path() -> PathBuf {
        jump_home().join("ignore")
    }
}

/// `[clean]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Default age limit for `j clean`, in days.
    pub max_age_days: Option<u64>,
}

/// `[selector]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub show_instructions: bool,
    pub abbreviate_home: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            show_instructions: true,
            abbreviate_home: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the history file location
    pub history_file: Option<String>,

    /// Overrides the ignore-pattern file location
    pub ignore_file: Option<String>,

    pub clean: CleanConfig,

    pub selector: SelectorConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::ConfigExists {
                path: path.to_path_buf(),
            });
        }
        write_atomic(path, default_config_template().as_bytes()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .as_deref()
            .map_or_else(paths::history_path, resolve_in_home)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.ignore_file
            .as_deref()
            .map_or_else(paths::ignore_path, resolve_in_home)
    }

    pub fn history_file(&self) -> HistoryFile {
        HistoryFile::new(self.history_path())
    }

    pub fn ignore_filter(&self) -> IgnoreFilter {
        IgnoreFilter::new(self.ignore_path())
    }

    /// Age limit configured for `j clean`, if any.
    pub fn max_age(&self) -> Option<Duration> {
        self.clean
            .max_age_days
            .map(|days| Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
    }
}

/// Expands a leading `~/` and anchors relative paths at J_HOME.
fn resolve_in_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        paths::jump_home().join(path)
    }
}
