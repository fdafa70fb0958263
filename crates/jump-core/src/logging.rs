//! Diagnostic logging.
//!
//! Logs go to stderr without colour: stdout carries the answer that shell
//! wrappers capture.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `J_LOG=debug`).
pub const LOG_ENV: &str = "J_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();
}
