//! Interactive list selector for j.
//!
//! - `selector`: pure state machine (navigation, confirm, delete)
//! - `render`: ratatui drawing of one selector frame
//! - `terminal`: raw mode / alternate screen lifecycle
//! - `runtime`: key loop and the terminal-backed `Picker`

pub mod render;
pub mod runtime;
pub mod selector;
pub mod terminal;

pub use runtime::TerminalPicker;
pub use selector::{Action, Finish, SelectorMode, SelectorState, Step};
