//! Event handling for the application.
//!
//! This module handles keyboard and mouse input, resizes and ticks.

mod handler;
mod keys;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;
pub use keys::{get_context_hints, key_name, KeyAction, KeyBindings, KeyContext};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The left mouse button was pressed at a terminal cell.
    Click { column: u16, row: u16 },
    /// The right mouse button was pressed at a terminal cell.
    ContextClick { column: u16, row: u16 },
    /// The terminal was resized to `(width, height)` cells.
    Resize(u16, u16),
    /// No input within the tick rate.
    Tick,
}
