//! CLI command handlers.

pub mod config;
pub mod history;
pub mod interactive;

use std::io::{self, Write};

use anyhow::{Context, Result};
use jump_core::HistoryStore;
use jump_core::config::Config;

use crate::cli::ExitFailure;

/// Loads the history named by `config`.
fn load_store(config: &Config) -> Result<HistoryStore> {
    let file = config.history_file();
    file.load(config.ignore_filter())
        .with_context(|| format!("load history from {}", file.path().display()))
}

fn save_store(config: &Config, store: &HistoryStore) -> Result<()> {
    let file = config.history_file();
    file.save(store)
        .with_context(|| format!("save history to {}", file.path().display()))
}

fn not_found(key: &str) -> anyhow::Error {
    ExitFailure::with_message(format!("no directory found for '{key}'")).into()
}

/// Prints one line per item. A closed pipe (`j list-all-keys | head`) ends
/// output quietly instead of failing.
fn print_lines<I, S>(lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        match writeln!(out, "{}", line.as_ref()) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
            other => other.context("write to stdout")?,
        }
    }
    match out.flush() {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("flush stdout"),
    }
}
