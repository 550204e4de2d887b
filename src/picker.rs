//! Multi-select state machine
//!
//! Holds the active row, the scroll window and the set of rows marked for
//! deletion. It knows nothing about terminals: the selector feeds it
//! discrete events and renders whatever state results.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeSet;
use std::ops::Range;

/// Input the picker reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Flip the active row between keep and delete
    Toggle,
    /// Mark every row, or clear all marks if every row is already marked
    ToggleAll,
    Confirm,
    Cancel,
    /// The number of rows available for items changed
    Resize(usize),
}

impl PickerEvent {
    /// Map a key press to an event, `None` for unbound keys
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(PickerEvent::Cancel),
                KeyCode::Char('p') => Some(PickerEvent::Up),
                KeyCode::Char('n') => Some(PickerEvent::Down),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(PickerEvent::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(PickerEvent::Down),
            KeyCode::PageUp => Some(PickerEvent::PageUp),
            KeyCode::PageDown => Some(PickerEvent::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(PickerEvent::Home),
            KeyCode::End | KeyCode::Char('G') => Some(PickerEvent::End),
            KeyCode::Char(' ') | KeyCode::Tab | KeyCode::Right | KeyCode::Left => {
                Some(PickerEvent::Toggle)
            }
            KeyCode::Char('a') => Some(PickerEvent::ToggleAll),
            KeyCode::Enter => Some(PickerEvent::Confirm),
            KeyCode::Esc | KeyCode::Char('q') => Some(PickerEvent::Cancel),
            _ => None,
        }
    }
}

/// Result of feeding an event to the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading input
    Pending,
    /// Ascending indices marked for deletion
    Confirmed(Vec<usize>),
    Cancelled,
}

/// Rows available for items given the terminal height
///
/// Never more than the item count, never less than one row.
pub fn window_rows(items: usize, terminal_height: u16, reserved_lines: u16) -> usize {
    let available = terminal_height.saturating_sub(reserved_lines) as usize;
    available.min(items).max(1)
}

/// Selection state over `len` items
#[derive(Debug, Clone)]
pub struct Picker {
    len: usize,
    active: usize,
    offset: usize,
    window: usize,
    toggled: BTreeSet<usize>,
}

impl Picker {
    /// Create a picker; out of range preselected indices are ignored
    pub fn new(len: usize, window: usize, preselected: &BTreeSet<usize>) -> Self {
        Self {
            len,
            active: 0,
            offset: 0,
            window: window.max(1),
            toggled: preselected.range(..len).copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_toggled(&self, index: usize) -> bool {
        self.toggled.contains(&index)
    }

    pub fn toggled_count(&self) -> usize {
        self.toggled.len()
    }

    /// Indices of the rows currently on screen
    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.window).min(self.len)
    }

    /// Ascending marked indices
    pub fn selection(&self) -> Vec<usize> {
        self.toggled.iter().copied().collect()
    }

    fn last(&self) -> usize {
        self.len.saturating_sub(1)
    }

    fn move_to(&mut self, index: usize) {
        self.active = index.min(self.last());
        self.scroll_to_active();
    }

    fn scroll_to_active(&mut self) {
        if self.active < self.offset {
            self.offset = self.active;
        } else if self.active >= self.offset + self.window {
            self.offset = self.active + 1 - self.window;
        }
        self.offset = self.offset.min(self.len.saturating_sub(self.window));
    }

    fn toggle_active(&mut self) {
        if self.is_empty() {
            return;
        }
        if !self.toggled.remove(&self.active) {
            self.toggled.insert(self.active);
        }
    }

    fn toggle_all(&mut self) {
        if self.toggled.len() == self.len {
            self.toggled.clear();
        } else {
            self.toggled = (0..self.len).collect();
        }
    }

    /// Apply one event
    pub fn handle(&mut self, event: PickerEvent) -> Outcome {
        match event {
            PickerEvent::Up => self.move_to(self.active.saturating_sub(1)),
            PickerEvent::Down => self.move_to(self.active + 1),
            PickerEvent::PageUp => self.move_to(self.active.saturating_sub(self.window)),
            PickerEvent::PageDown => self.move_to(self.active + self.window),
            PickerEvent::Home => self.move_to(0),
            PickerEvent::End => self.move_to(self.last()),
            PickerEvent::Toggle => self.toggle_active(),
            PickerEvent::ToggleAll => self.toggle_all(),
            PickerEvent::Resize(rows) => {
                self.window = rows.max(1);
                self.scroll_to_active();
            }
            PickerEvent::Confirm => return Outcome::Confirmed(self.selection()),
            PickerEvent::Cancel => return Outcome::Cancelled,
        }
        Outcome::Pending
    }

    /// Feed events until one ends the selection
    pub fn run<I: IntoIterator<Item = PickerEvent>>(&mut self, events: I) -> Outcome {
        for event in events {
            match self.handle(event) {
                Outcome::Pending => {}
                done => return done,
            }
        }
        Outcome::Pending
    }
}
