// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. keymap::KeyMapError)
    clippy::module_name_repetitions
)]

//! # Discview
//!
//! A terminal viewer for a list of repository discussions.
//!
//! Discview shows the discussions as a list with a selection cursor,
//! moves the cursor with the keyboard, and tracks a second cursor over the
//! discussion categories (sections).
//!
//! ## Architecture
//!
//! Discview uses The Elm Architecture (TEA) pattern:
//! - **Model**: Viewer state
//! - **Message**: Key and resize events
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Model, update and the event loop
//! - [`discussion`]: Discussion records and sections
//! - [`keymap`]: Key bindings for the viewer's actions
//! - [`config`]: Saved defaults and flag parsing
//! - [`ui`]: Terminal rendering

pub mod app;
pub mod config;
pub mod discussion;
pub mod keymap;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, QuitSignal};
    pub use crate::discussion::{Discussion, Section};
    pub use crate::keymap::KeyMap;
    pub use crate::ui::viewport::Viewport;
}
