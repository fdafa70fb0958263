//! Commands that may open the terminal selector.

use anyhow::{Context, Result};
use jump_core::Resolution;
use jump_core::config::Config;
use jump_core::session;
use jump_tui::TerminalPicker;
use tracing::debug;

use super::{load_store, not_found, print_lines, save_store};
use crate::cli::ExitFailure;

pub fn select(config: &Config, key: &str) -> Result<()> {
    let mut store = load_store(config)?;
    let before = store.as_map().clone();
    let mut picker = TerminalPicker::new(&config.selector);

    let resolution = session::disambiguate(&mut store, key, &mut picker)
        .with_context(|| format!("select directory for '{key}'"))?;
    // Only the staleness sweep or a promotion changes the store.
    if store.as_map() != &before {
        save_store(config, &store)?;
    }

    match resolution {
        Resolution::Found(path) => print_lines([path]),
        Resolution::NotFound => Err(not_found(key)),
        Resolution::Cancelled => Err(ExitFailure::silent().into()),
    }
}

pub fn prune(config: &Config, key: &str) -> Result<()> {
    let mut store = load_store(config)?;
    let swept = store.prune_stale(key);
    if store.entries(key).is_empty() {
        if swept > 0 {
            save_store(config, &store)?;
        }
        return Err(not_found(key));
    }

    let mut picker = TerminalPicker::new(&config.selector);
    let removed = session::prune_interactive(&mut store, key, &mut picker)
        .with_context(|| format!("prune directories for '{key}'"))?;
    debug!(key, removed = removed.len(), "pruned entries");
    save_store(config, &store)
}
