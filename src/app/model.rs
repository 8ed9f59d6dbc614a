use std::fmt::Write as _;

use crossterm::event::KeyEvent;

use crate::discussion::{Discussion, Section, sections_of};
use crate::keymap::KeyMap;
use crate::ui::viewport::Viewport;

use super::update::Message;

/// Rows above the list: title, underline, blank line.
pub const HEADER_HEIGHT: u16 = 3;
/// Rows below the list: blank line, help line.
pub const FOOTER_HEIGHT: u16 = 2;
/// Row reserved for the pager.
pub const PAGER_HEIGHT: u16 = 1;
/// Columns given to the preview pane, fixed at the first layout.
pub const PREVIEW_WIDTH: u16 = 50;

pub const LOADING_TEXT: &str = "Loading...";
pub const HEADER_TEXT: &str = "Discussions";
pub const HEADER_RULE: &str = "===========";
pub const HELP_TEXT: &str = "Use ↑/↓ to navigate, q to quit";

/// Returned by [`Model::handle_key`] when the viewer should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitSignal;

/// Selected discussion and selected section.
///
/// Both indices stay inside their collection, or at 0 when it is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub item: usize,
    pub section: usize,
}

/// The complete viewer state.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Discussions in display order
    pub items: Vec<Discussion>,
    /// Sections derived from the discussions once the layout is known
    pub sections: Vec<Section>,
    pub cursor: Cursor,
    /// List pane: fixed width, scroll window over `items`
    pub content: Viewport,
    /// Preview pane beside the list
    pub preview: Viewport,
    /// Terminal width at the most recent resize
    pub width: u16,
    /// False until the first size event
    pub ready: bool,
    pub should_quit: bool,
}

impl Model {
    /// Create a model in the loading state with the cursor at the top.
    pub fn new(items: Vec<Discussion>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub const fn content_width(&self) -> u16 {
        self.content.width()
    }

    pub const fn content_height(&self) -> u16 {
        self.content.height()
    }

    pub const fn preview_width(&self) -> u16 {
        PREVIEW_WIDTH
    }

    pub const fn preview_height(&self) -> u16 {
        self.preview.height()
    }

    /// The highlighted discussion, if the list is non-empty.
    pub fn selected(&self) -> Option<&Discussion> {
        self.items.get(self.cursor.item)
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.cursor.section)
    }

    pub fn cursor_up(&mut self) {
        self.cursor.item = self.cursor.item.saturating_sub(1);
        self.content.scroll_into_view(self.cursor.item);
    }

    pub fn cursor_down(&mut self) {
        self.cursor.item = (self.cursor.item + 1).min(self.items.len().saturating_sub(1));
        self.content.scroll_into_view(self.cursor.item);
    }

    pub const fn prev_section(&mut self) {
        self.cursor.section = self.cursor.section.saturating_sub(1);
    }

    pub fn next_section(&mut self) {
        self.cursor.section = (self.cursor.section + 1).min(self.sections.len().saturating_sub(1));
    }

    /// Recompute pane sizes for a terminal of `width` x `height` cells.
    ///
    /// The first call lays out both panes and leaves the loading state.
    /// Later calls only update the heights; widths stay as first laid out.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        let vertical_margins = HEADER_HEIGHT + FOOTER_HEIGHT + PAGER_HEIGHT;
        let content_height = height.saturating_sub(vertical_margins + 1);
        let preview_height = height.saturating_add(1).saturating_sub(vertical_margins);

        if self.ready {
            self.content.set_height(content_height);
            self.preview.set_height(preview_height);
        } else {
            self.content = Viewport::new(
                width.saturating_sub(PREVIEW_WIDTH),
                content_height,
                self.items.len(),
            );
            self.preview = Viewport::new(0, preview_height, 0);
            self.sections = sections_of(&self.items);
            self.ready = true;
            tracing::info!(
                width,
                height,
                items = self.items.len(),
                sections = self.sections.len(),
                "viewer ready"
            );
        }
        self.content.scroll_into_view(self.cursor.item);
    }

    /// Translate `key` through `keymap` and apply it.
    ///
    /// Returns [`QuitSignal`] when the key is bound to quit. Unbound keys do
    /// nothing.
    pub fn handle_key(&mut self, keymap: &KeyMap, key: KeyEvent) -> Option<QuitSignal> {
        let msg = Message::from(keymap.action_for(key)?);
        let quit = msg == Message::Quit;
        *self = super::update(std::mem::take(self), msg);
        quit.then_some(QuitSignal)
    }

    /// Plain-text rendering of the current state.
    pub fn render_text(&self) -> String {
        if !self.ready {
            return LOADING_TEXT.to_string();
        }

        let mut s = String::new();
        s.push_str(HEADER_TEXT);
        s.push('\n');
        s.push_str(HEADER_RULE);
        s.push_str("\n\n");
        for (i, item) in self.items.iter().enumerate() {
            let _ = writeln!(s, "{}{}", row_prefix(i == self.cursor.item), item.title);
        }
        s.push('\n');
        s.push_str(HELP_TEXT);
        s.push('\n');
        s
    }
}

/// Two-column marker in front of each list row.
pub const fn row_prefix(selected: bool) -> &'static str {
    if selected { "> " } else { "  " }
}
