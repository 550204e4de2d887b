//! Terminal checklist for choosing what to delete
//!
//! Draws the picker inline below the prompt (no alternate screen), one
//! line per resource, and blocks on keyboard input until the operator
//! confirms or cancels.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::picker::{window_rows, Outcome, Picker, PickerEvent};
use crate::resource::ResourceRecord;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal, TerminalOptions, Viewport,
};
use std::collections::BTreeSet;
use std::io::{self, Stdout};
use tracing::debug;

/// Marker for rows that will be deleted
pub const DELETE_MARKER: &str = "Delete - ";

/// Marker for rows that will be kept
pub const KEEP_MARKER: &str = "Keep   - ";

/// Label and footer lines drawn around the item window
const CHROME_LINES: u16 = 2;

/// Lets the operator choose a subset of records
pub trait Selector {
    /// Return the ascending indices chosen for deletion
    ///
    /// Fails with `Error::SelectionCancelled` when the operator aborts.
    fn select(
        &mut self,
        label: &str,
        items: &[ResourceRecord],
        preselected: &BTreeSet<usize>,
    ) -> Result<Vec<usize>>;
}

/// Interactive selector on the controlling terminal
#[derive(Debug, Clone)]
pub struct TerminalSelector {
    fallback_height: u16,
    reserved_lines: u16,
}

impl TerminalSelector {
    pub fn new(config: &Config) -> Self {
        Self {
            fallback_height: config.fallback_height,
            reserved_lines: config.reserved_lines,
        }
    }

    /// Terminal height, or the fallback when it cannot be queried
    ///
    /// crossterm asks the controlling terminal (`/dev/tty`) first and only
    /// then stdout, so with stdout redirected this is still the size of the
    /// terminal the picker reads keys from. A zero or unknown height uses
    /// `fallback_height`.
    fn terminal_height(&self) -> u16 {
        match terminal::size() {
            Ok((_, rows)) if rows > 0 => rows,
            _ => self.fallback_height,
        }
    }
}

impl Selector for TerminalSelector {
    fn select(
        &mut self,
        label: &str,
        items: &[ResourceRecord],
        preselected: &BTreeSet<usize>,
    ) -> Result<Vec<usize>> {
        let rows = window_rows(items.len(), self.terminal_height(), self.reserved_lines);
        debug!(rows, items = items.len(), "opening selector");
        let mut picker = Picker::new(items.len(), rows, preselected);

        let outcome = run_picker(&mut picker, label, items, rows, self)
            .map_err(|e| Error::selection(e.to_string()))?;

        match outcome {
            Outcome::Confirmed(indices) => {
                debug!(?indices, "selection confirmed");
                Ok(indices)
            }
            Outcome::Cancelled | Outcome::Pending => Err(Error::SelectionCancelled),
        }
    }
}

fn run_picker(
    picker: &mut Picker,
    label: &str,
    items: &[ResourceRecord],
    rows: usize,
    selector: &TerminalSelector,
) -> io::Result<Outcome> {
    // Setup terminal
    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let options = TerminalOptions {
        viewport: Viewport::Inline(rows as u16 + CHROME_LINES),
    };
    let mut terminal = match Terminal::with_options(backend, options) {
        Ok(terminal) => terminal,
        Err(e) => {
            disable_raw_mode()?;
            return Err(e);
        }
    };

    let result = event_loop(&mut terminal, picker, label, items, rows, selector);

    // Always restore terminal, every step even if an earlier one failed
    let cleared = terminal.clear();
    let cooked = disable_raw_mode();
    let cursor = terminal.show_cursor();
    cleared?;
    cooked?;
    cursor?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    picker: &mut Picker,
    label: &str,
    items: &[ResourceRecord],
    max_rows: usize,
    selector: &TerminalSelector,
) -> io::Result<Outcome> {
    loop {
        terminal.draw(|frame| render(frame, picker, label, items))?;

        let event = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => PickerEvent::from_key(key),
            // The inline viewport cannot grow, only the window inside it shrinks
            Event::Resize(_, height) => Some(PickerEvent::Resize(
                window_rows(items.len(), height, selector.reserved_lines).min(max_rows),
            )),
            _ => None,
        };

        if let Some(event) = event {
            match picker.handle(event) {
                Outcome::Pending => {}
                done => return Ok(done),
            }
        }
    }
}

fn render(frame: &mut Frame, picker: &Picker, label: &str, items: &[ResourceRecord]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Min(1),    // Items
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("? ", Style::default().fg(Color::Green)),
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
    ]));
    frame.render_widget(header, chunks[0]);

    let lines: Vec<Line> = picker
        .visible()
        .map(|idx| {
            let active = idx == picker.active();
            let (marker, marker_style) = if picker.is_toggled(idx) {
                (DELETE_MARKER, Style::default().fg(Color::Red))
            } else {
                (KEEP_MARKER, Style::default().fg(Color::Green))
            };
            let text_style = if active {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Line::from(vec![
                Span::raw(if active { "> " } else { "  " }),
                Span::styled(marker, marker_style),
                Span::styled(items[idx].display_line.as_str(), text_style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let help = format!(
        "{} of {} marked for deletion  ↑/↓ move  space toggle  a all  enter confirm  esc cancel",
        picker.toggled_count(),
        picker.len()
    );
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}
