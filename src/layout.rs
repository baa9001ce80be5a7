//! Responsive grid layout for the terminal.
//!
//! Items get a preferred size from the config; the column count is the
//! area width divided by the preferred width, rounded, and items are then
//! stretched so the columns fill the area exactly.

use crate::visibility::LayoutProbe;
use crate::viewport::{fully_visible, ItemRect, Viewport};

/// Which edge of the viewport a scrolled-to item should align with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Item top at the viewport top
    Near,
    /// Item bottom at the viewport bottom
    Far,
}

#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Grid area width in cells
    width: u16,
    /// Grid area height in cells
    height: u16,
    /// Preferred item width from config
    preferred_width: u16,
    /// Item height in cells
    item_height: u16,
    /// Number of items laid out
    item_count: usize,
    /// Rows scrolled past the top of the grid area
    scroll_top: u32,
}

impl GridLayout {
    pub fn new(preferred_width: u16, item_height: u16) -> Self {
        Self {
            width: 0,
            height: 0,
            preferred_width: preferred_width.max(1),
            item_height: item_height.max(1),
            item_count: 0,
            scroll_top: 0,
        }
    }

    /// Update the area the grid is drawn into. Keeps the scroll offset valid.
    pub fn set_area(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_scroll();
    }

    /// Replace the number of items and go back to the top.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.scroll_top = 0;
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn item_height(&self) -> u16 {
        self.item_height
    }

    /// Actual item width once columns are stretched to fill the area.
    pub fn item_width(&self) -> u16 {
        match self.columns() {
            0 => 0,
            columns => self.width / columns as u16,
        }
    }

    fn columns(&self) -> usize {
        if self.width == 0 {
            return 0;
        }
        let ratio = self.width as f32 / self.preferred_width as f32;
        (ratio.round() as usize).max(1)
    }

    pub fn row_count(&self) -> usize {
        match self.columns() {
            0 => 0,
            columns => self.item_count.div_ceil(columns),
        }
    }

    pub fn content_height(&self) -> u32 {
        self.row_count() as u32 * self.item_height as u32
    }

    pub fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.height as u32)
    }

    pub fn scroll_to(&mut self, offset: u32) {
        self.scroll_top = offset.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let target = (self.scroll_top as i64 + delta as i64).max(0) as u32;
        self.scroll_to(target);
    }

    /// Bring the item at `index` into view, aligned to `align`.
    pub fn scroll_into_view(&mut self, index: usize, align: Align) {
        let columns = self.columns();
        if columns == 0 || index >= self.item_count {
            return;
        }
        let top = (index / columns) as u32 * self.item_height as u32;
        let offset = match align {
            Align::Near => top,
            Align::Far => (top + self.item_height as u32).saturating_sub(self.height as u32),
        };
        self.scroll_to(offset);
    }

    /// Whether the item at `index` is entirely inside the viewport.
    pub fn is_fully_visible(&self, index: usize) -> bool {
        self.item_rect(index)
            .is_some_and(|rect| fully_visible(&rect, &self.viewport()))
    }

    /// Range of rows intersecting the viewport, for rendering.
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        let item_height = self.item_height as u32;
        let first = (self.scroll_top / item_height) as usize;
        let last = (self.scroll_top + self.height as u32).div_ceil(item_height) as usize;
        first..last.min(self.row_count())
    }

    fn clamp_scroll(&mut self) {
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }
}

impl LayoutProbe for GridLayout {
    fn item_count(&self) -> usize {
        self.item_count
    }

    fn column_count(&self) -> usize {
        self.columns()
    }

    fn item_rect(&self, index: usize) -> Option<ItemRect> {
        let columns = self.columns();
        if columns == 0 || index >= self.item_count {
            return None;
        }
        let row = (index / columns) as i64;
        let col = (index % columns) as i64;
        let top = row * self.item_height as i64 - self.scroll_top as i64;
        let left = col * self.item_width() as i64;
        Some(ItemRect::new(
            top as i32,
            left as i32,
            self.item_width() as i32,
            self.item_height as i32,
        ))
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as i32, self.height as i32)
    }
}
