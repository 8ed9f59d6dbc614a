//! Viewer state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete viewer state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use event_loop::{CrosstermEvents, EventSource, Renderer};
pub use input::message_for_event;
pub use model::{
    Cursor, FOOTER_HEIGHT, HEADER_HEIGHT, HEADER_RULE, HEADER_TEXT, HELP_TEXT, LOADING_TEXT,
    Model, PAGER_HEIGHT, PREVIEW_WIDTH, QuitSignal, row_prefix,
};
pub use update::{Message, update};

use crate::discussion::Discussion;
use crate::keymap::KeyMap;

/// Main application struct that owns the inputs and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    items: Vec<Discussion>,
    keymap: KeyMap,
}

impl App {
    /// Create a new application showing `items`.
    pub fn new(items: Vec<Discussion>) -> Self {
        Self {
            items,
            keymap: KeyMap::default(),
        }
    }

    /// Use `keymap` instead of the default bindings.
    #[must_use]
    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }
}

#[cfg(test)]
mod tests;
