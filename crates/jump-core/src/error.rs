//! Error kinds surfaced by the core library.
//!
//! Expected outcomes (unknown key, cancelled selection, ignored path) are
//! values, not errors. Everything here means the operation could not proceed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The history file exists but does not hold a valid snapshot.
    ///
    /// Never recovered from silently: resetting would discard the history.
    #[error("History file {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("History file {} has unsupported version {version}", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config from {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file already exists at {}", path.display())]
    ConfigExists { path: PathBuf },

    /// The interactive selector failed (no terminal, I/O error while drawing).
    #[error("Interactive selection failed")]
    Session(#[source] io::Error),
}
