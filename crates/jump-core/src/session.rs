//! Interactive operations over the store.
//!
//! The store does not know how a human chooses between paths; it hands the
//! ranked list to a [`Picker`] and applies the answer.

use std::io;

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::HistoryStore;

/// Something that lets a user choose from, or prune, an ordered list.
pub trait Picker {
    /// Returns the index of the chosen item, or `None` if the user quit.
    fn pick(&mut self, items: &[String]) -> io::Result<Option<usize>>;

    /// Returns the indices of the items the user deleted, in deletion order.
    fn prune(&mut self, items: &[String]) -> io::Result<Vec<usize>>;
}

/// Result of resolving a key to a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
    Cancelled,
}

/// Picks one live path for `key`, asking the user only when there is more
/// than one. A picked path is promoted to most recent.
pub fn disambiguate<P: Picker + ?Sized>(
    store: &mut HistoryStore,
    key: &str,
    picker: &mut P,
) -> Result<Resolution> {
    let mut paths = store.paths(key);
    match paths.len() {
        0 => return Ok(Resolution::NotFound),
        1 => return Ok(Resolution::Found(paths.swap_remove(0))),
        _ => {}
    }

    let Some(index) = picker.pick(&paths).map_err(Error::Session)? else {
        debug!(key, "selection cancelled");
        return Ok(Resolution::Cancelled);
    };
    let Some(chosen) = paths.get(index).cloned() else {
        return Ok(Resolution::Cancelled);
    };

    store.promote(key, &chosen);
    Ok(Resolution::Found(chosen))
}

/// Lets the user delete paths recorded under `key`.
///
/// Returns the removed paths. Nothing is shown when the key has no live
/// paths after the sweep.
pub fn prune_interactive<P: Picker + ?Sized>(
    store: &mut HistoryStore,
    key: &str,
    picker: &mut P,
) -> Result<Vec<String>> {
    let paths = store.paths(key);
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let removed_indices = picker.prune(&paths).map_err(Error::Session)?;
    let mut removed = Vec::with_capacity(removed_indices.len());
    for index in removed_indices {
        let Some(path) = paths.get(index) else {
            continue;
        };
        if store.remove_entry(key, path) {
            removed.push(path.clone());
        }
    }
    Ok(removed)
}
