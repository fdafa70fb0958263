//! Terminal lifecycle management.
//!
//! This module handles terminal setup, restore, and panic hooks.
//! The selector draws on stderr so stdout stays free for the chosen path.
//! Terminal state is guaranteed to be restored on:
//! - Normal exit (via Drop)
//! - Error exit (via Drop)
//! - Panic

use std::io::{self, IsTerminal, Stderr};
use std::panic;
use std::sync::Once;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type SelectorTerminal = Terminal<CrosstermBackend<Stderr>>;

/// Owns the terminal for one selector session; restores it when dropped.
pub struct TerminalGuard {
    terminal: SelectorTerminal,
}

impl TerminalGuard {
    /// Takes over the terminal.
    ///
    /// - Fails if stderr is not a terminal
    /// - Installs the restore-on-panic hook (once per process)
    /// - Enables raw mode (no echo, unbuffered keys)
    /// - Enters alternate screen and hides the cursor
    pub fn acquire() -> io::Result<Self> {
        if !io::stderr().is_terminal() {
            return Err(io::Error::other(
                "interactive selection requires a terminal on stderr",
            ));
        }
        install_panic_hook();

        enable_raw_mode()?;
        let mut stderr = io::stderr();
        if let Err(err) = execute!(stderr, EnterAlternateScreen, Hide) {
            let _ = restore_terminal();
            return Err(err);
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stderr)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = restore_terminal();
                return Err(err);
            }
        };
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut SelectorTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Restores terminal state.
///
/// - Shows the cursor
/// - Leaves alternate screen
/// - Disables raw mode
///
/// This function is idempotent and safe to call multiple times.
pub fn restore_terminal() -> io::Result<()> {
    // Leave alternate screen while still in raw mode
    restore_with(
        || execute!(io::stderr(), Show, LeaveAlternateScreen),
        disable_raw_mode,
    )
}

/// Runs both restore steps even when the first fails, returning the first
/// error.
fn restore_with(
    leave_screen: impl FnOnce() -> io::Result<()>,
    leave_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let screen = leave_screen();
    let raw_mode = leave_raw_mode();
    screen.and(raw_mode)
}

/// Installs a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
}
