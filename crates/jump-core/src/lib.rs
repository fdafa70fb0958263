//! Core j library (history store, ignore rules, persistence, config).

pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod persistence;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use ignore::IgnoreFilter;
pub use persistence::HistoryFile;
pub use session::{Picker, Resolution};
pub use store::{AddOutcome, CURRENT_DIR, Entry, HistoryStore};
