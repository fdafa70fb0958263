//! Selector runtime - owns the terminal, feeds key presses to the state
//! machine, redraws after every accepted key.

use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use jump_core::Picker;
use jump_core::config::SelectorConfig;
use tracing::debug;

use crate::render::{instructions_for, render_selector};
use crate::selector::{Action, Finish, SelectorMode, SelectorState, Step};
use crate::terminal::TerminalGuard;

/// Blocking source of key presses.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

/// Reads key presses from the controlling terminal.
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            // Resize, focus and key-release events are not transitions.
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(key);
            }
        }
    }
}

/// Runs a session to completion: draw, wait for a key, transition, repeat.
///
/// An empty list finishes at once without drawing.
pub fn run_session<K, D>(mut state: SelectorState, keys: &mut K, mut draw: D) -> io::Result<Finish>
where
    K: KeySource + ?Sized,
    D: FnMut(&SelectorState) -> io::Result<()>,
{
    if state.is_empty() {
        return Ok(state.finish_early());
    }
    loop {
        draw(&state)?;
        let action = Action::from_key(keys.next_key()?);
        if let Step::Done(finish) = state.handle(action) {
            debug!(?finish, "selector finished");
            return Ok(finish);
        }
    }
}

/// [`Picker`] backed by a full-screen terminal session.
#[derive(Debug, Clone)]
pub struct TerminalPicker {
    show_instructions: bool,
    home: Option<PathBuf>,
}

impl TerminalPicker {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            show_instructions: config.show_instructions,
            home: if config.abbreviate_home {
                dirs::home_dir()
            } else {
                None
            },
        }
    }

    fn run(&self, mode: SelectorMode, items: &[String]) -> io::Result<Finish> {
        let labels = items
            .iter()
            .map(|item| match &self.home {
                Some(home) => abbreviate_home(item, home),
                None => item.clone(),
            })
            .collect();
        let state = SelectorState::new(mode, labels);
        let banner = self.show_instructions.then(|| instructions_for(mode));

        let mut guard = TerminalGuard::acquire()?;
        run_session(state, &mut CrosstermKeys, |state| {
            guard
                .terminal()
                .draw(|frame| render_selector(frame, state, banner))?;
            Ok(())
        })
    }
}

impl Picker for TerminalPicker {
    fn pick(&mut self, items: &[String]) -> io::Result<Option<usize>> {
        match self.run(SelectorMode::Select, items)? {
            Finish::Selected(index) => Ok(Some(index)),
            Finish::Cancelled | Finish::Pruned(_) => Ok(None),
        }
    }

    fn prune(&mut self, items: &[String]) -> io::Result<Vec<usize>> {
        match self.run(SelectorMode::Prune, items)? {
            Finish::Pruned(removed) => Ok(removed),
            Finish::Selected(_) | Finish::Cancelled => Ok(Vec::new()),
        }
    }
}

/// Displays paths under `home` as `~/...`.
pub fn abbreviate_home(path: &str, home: &Path) -> String {
    match Path::new(path).strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.to_string(),
    }
}
