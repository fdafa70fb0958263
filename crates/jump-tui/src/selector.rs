//! List selector state machine.
//!
//! Pure: `SelectorState::handle` maps one key action to the next state and
//! either asks for a redraw or finishes the session. The terminal adapter in
//! `runtime` feeds it real key presses.
//!
//! Navigation wraps around. Deleting the last row clamps the cursor instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    /// Pick one item.
    Select,
    /// Delete any number of items.
    Prune,
}

/// Key bindings, decoded from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Confirm,
    Delete,
    Quit,
    Other,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Self {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit,
            _ if ctrl => Action::Other,
            KeyCode::Up | KeyCode::Char('k') => Action::Up,
            KeyCode::Down | KeyCode::Char('j') => Action::Down,
            // Some terminals deliver Enter as a raw LF or CR character.
            KeyCode::Enter | KeyCode::Char('\n' | '\r') => Action::Confirm,
            KeyCode::Char('d') => Action::Delete,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::Other,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    /// Index (into the original list) of the confirmed item.
    Selected(usize),
    /// The user quit a select session.
    Cancelled,
    /// Indices (into the original list) of deleted items, in deletion order.
    Pruned(Vec<usize>),
}

/// Result of handling one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Done(Finish),
}

#[derive(Debug, Clone)]
pub struct SelectorState {
    mode: SelectorMode,
    items: Vec<String>,
    /// Original index of each remaining item.
    origin: Vec<usize>,
    cursor: usize,
    removed: Vec<usize>,
}

impl SelectorState {
    pub fn new(mode: SelectorMode, items: Vec<String>) -> Self {
        let origin = (0..items.len()).collect();
        Self {
            mode,
            items,
            origin,
            cursor: 0,
            removed: Vec::new(),
        }
    }

    /// Items still in the working list.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Original indices deleted so far.
    pub fn removed(&self) -> &[usize] {
        &self.removed
    }

    /// The outcome if the session ended right now without a confirm.
    pub fn finish_early(&self) -> Finish {
        match self.mode {
            SelectorMode::Select => Finish::Cancelled,
            SelectorMode::Prune => Finish::Pruned(self.removed.clone()),
        }
    }

    pub fn handle(&mut self, action: Action) -> Step {
        match (action, self.mode) {
            (Action::Down, _) => {
                self.move_down();
                Step::Redraw
            }
            (Action::Up, _) => {
                self.move_up();
                Step::Redraw
            }
            (Action::Quit, _) => Step::Done(self.finish_early()),
            (Action::Confirm, SelectorMode::Select) => match self.origin.get(self.cursor) {
                Some(&index) => Step::Done(Finish::Selected(index)),
                None => Step::Done(Finish::Cancelled),
            },
            (Action::Delete, SelectorMode::Prune) => self.delete_current(),
            _ => Step::Redraw,
        }
    }

    fn move_down(&mut self) {
        let len = self.items.len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    fn move_up(&mut self) {
        let len = self.items.len();
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    fn delete_current(&mut self) -> Step {
        if self.cursor >= self.items.len() {
            return Step::Done(self.finish_early());
        }
        self.items.remove(self.cursor);
        self.removed.push(self.origin.remove(self.cursor));

        if self.items.is_empty() {
            return Step::Done(Finish::Pruned(self.removed.clone()));
        }
        if self.cursor >= self.items.len() {
            self.cursor -= 1;
        }
        Step::Redraw
    }
}
