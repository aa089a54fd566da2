//! Terminal User Interface for tvmaze-browser using ratatui.
//!
//! This module provides a full-screen TUI with a filter bar, a card list
//! with a detail pane, and picker popups for shows and items.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::App;
pub use types::{Action, Focus, Picker, PickerKind};

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// Poll for keyboard events with a timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
