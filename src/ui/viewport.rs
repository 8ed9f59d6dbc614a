//! Pane dimensions and list scrolling.
//!
//! A [`Viewport`] records the size of one pane and, for the content pane,
//! which window of the discussion list is on screen.

use std::ops::Range;

/// Size of a pane plus the scroll window over its rows.
///
/// # Example
///
/// ```
/// use discview::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(50, 10, 100);
/// assert_eq!(vp.visible_range(), 0..10);
///
/// vp.scroll_into_view(42);
/// assert_eq!(vp.visible_range(), 33..43);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Pane width in columns
    /// * `height` - Pane height in rows
    /// * `total_lines` - Rows of content behind the pane
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Rows currently on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Change the height only; the width keeps its first-layout value.
    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Scroll the minimum amount needed for `line` to be on screen.
    pub fn scroll_into_view(&mut self, line: usize) {
        let height = self.height as usize;
        if height == 0 {
            return;
        }
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
