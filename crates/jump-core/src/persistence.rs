//! Durable storage for the history map.
//!
//! The file is a JSON document written atomically: the new snapshot goes to
//! a temporary file in the same directory, which is then renamed over the
//! canonical file. Readers see either the old or the new snapshot in full.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ignore::IgnoreFilter;
use crate::store::{Entry, HistoryStore};

/// Version written to and accepted from the history file.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryDocument {
    version: u32,
    #[serde(default)]
    keys: BTreeMap<String, Vec<Entry>>,
}

/// Loads and saves a [`HistoryStore`] at a fixed path.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the store. A missing file is an empty store; an unreadable or
    /// malformed one is an error.
    pub fn load(&self, ignore: IgnoreFilter) -> Result<HistoryStore> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ok(HistoryStore::new(ignore));
            }
            Err(source) => {
                return Err(Error::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: HistoryDocument =
            serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        if document.version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                path: self.path.clone(),
                version: document.version,
            });
        }

        debug!(path = %self.path.display(), keys = document.keys.len(), "loaded history");
        Ok(HistoryStore::from_map(document.keys, ignore))
    }

    /// Atomically replaces the history file with the store's contents.
    pub fn save(&self, store: &HistoryStore) -> Result<()> {
        #[derive(Serialize)]
        struct HistoryDocumentRef<'a> {
            version: u32,
            keys: &'a BTreeMap<String, Vec<Entry>>,
        }

        let document = HistoryDocumentRef {
            version: FORMAT_VERSION,
            keys: store.as_map(),
        };
        let mut contents = serde_json::to_vec_pretty(&document).map_err(|err| Error::Write {
            path: self.path.clone(),
            source: err.into(),
        })?;
        contents.push(b'\n');

        write_atomic(&self.path, &contents).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), keys = store.len(), "saved history");
        Ok(())
    }
}

/// Writes `contents` to `path` via a temp file and rename, creating parent
/// directories as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
