//! Non-interactive history commands.

use std::env;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use jump_core::Entry;
use jump_core::config::Config;
use tracing::debug;

use super::{load_store, not_found, print_lines, save_store};
use crate::cli::ExitFailure;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub fn add_cwd(config: &Config) -> Result<()> {
    // The directory can vanish under the shell, e.g. after a branch switch.
    // This runs from prompt hooks, so fail without a message.
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            debug!(error = %err, "current directory is unavailable");
            return Err(ExitFailure::silent().into());
        }
    };
    let Some(path) = cwd.to_str() else {
        debug!(path = %cwd.display(), "current directory is not valid UTF-8");
        return Err(ExitFailure::silent().into());
    };

    let mut store = load_store(config)?;
    let outcome = store.add(path);
    debug!(path, ?outcome, "added current directory");
    // Even an ignored add may have swept stale entries, so always save.
    save_store(config, &store)
}

pub fn list_all_keys(config: &Config) -> Result<()> {
    let store = load_store(config)?;
    print_lines(store.keys())
}

pub fn list(config: &Config, key: &str, verbose: bool) -> Result<()> {
    let mut store = load_store(config)?;
    if store.prune_stale(key) > 0 {
        save_store(config, &store)?;
    }

    let entries = store.entries(key);
    if entries.is_empty() {
        return Err(not_found(key));
    }

    if verbose {
        print_lines(entries.into_iter().map(format_verbose))
    } else {
        print_lines(entries.into_iter().map(|entry| entry.path.as_str()))
    }
}

pub fn resolve(config: &Config, key: &str) -> Result<()> {
    let store = load_store(config)?;
    print_lines([store.resolve(key)])
}

pub fn clean(config: &Config, max_age_days: Option<u64>) -> Result<()> {
    let max_age = max_age_days
        .map(|days| Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
        .or_else(|| config.max_age());

    let mut store = load_store(config)?;
    let mut removed = store.prune_all();
    if let Some(max_age) = max_age {
        removed += store.expire(max_age);
    }
    save_store(config, &store)?;

    println!(
        "Removed {removed} {}.",
        if removed == 1 { "entry" } else { "entries" }
    );
    Ok(())
}

fn format_verbose(entry: &Entry) -> String {
    let visited = DateTime::from_timestamp(entry.last_accessed, 0).map_or_else(
        || "unknown".to_string(),
        |utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    );
    format!("{visited}  {}", entry.path)
}
