//! Terminal UI components.
//!
//! - [`viewport`]: Pane sizes and the list's scroll window
//! - [`render()`]: Ratatui rendering of the viewer

pub mod viewport;

mod render;

pub use render::{render, truncate_to_width};
