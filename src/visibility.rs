//! Incremental tracking of which grid items are on screen.
//!
//! The tracker keeps the last contiguous band of visible indices and the set
//! of every index that has been visible since the last reset. Both are
//! caches: dropping them and recomputing from scratch is always correct,
//! only slower.
//!
//! Recomputation probes one item per row and resumes from the trailing edge
//! of the previous band, so a scroll tick costs a handful of probes instead
//! of a pass over the whole grid. This relies on every item of a row entering
//! and leaving the viewport together (fixed row height, fixed column count).
//! When a jump moves the viewport entirely away from the scan path nothing
//! is found and the previous band is kept as is.

use std::collections::HashSet;

use crate::viewport::{partially_visible, ItemRect, Viewport};

/// Geometry the tracker needs from whoever lays out the grid.
pub trait LayoutProbe {
    /// Number of items in the grid
    fn item_count(&self) -> usize;

    /// Number of columns in the grid (0 when layout is unavailable)
    fn column_count(&self) -> usize;

    /// Current bounding box of the item at `index`
    fn item_rect(&self, index: usize) -> Option<ItemRect>;

    /// Current viewport size
    fn viewport(&self) -> Viewport;
}

/// Direction the viewport last moved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Down,
    Up,
}

impl ScrollDirection {
    /// Direction implied by moving from one scroll offset to another.
    pub fn between(previous: u32, current: u32) -> Self {
        if current < previous {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        }
    }
}

/// Inclusive, row-aligned range of visible indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleBand {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Default)]
pub struct VisibilityTracker {
    band: Option<VisibleBand>,
    ever_visible: HashSet<usize>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything. Call whenever the backing item list is replaced.
    pub fn reset(&mut self) {
        self.band = None;
        self.ever_visible.clear();
    }

    pub fn band(&self) -> Option<VisibleBand> {
        self.band
    }

    pub fn is_ever_visible(&self, index: usize) -> bool {
        self.ever_visible.contains(&index)
    }

    pub fn ever_visible_count(&self) -> usize {
        self.ever_visible.len()
    }

    /// Recompute the visible band after the viewport moved in `direction`.
    ///
    /// Returns the new band, or `None` when nothing visible was found (the
    /// stored band is then left untouched).
    pub fn recompute(
        &mut self,
        direction: ScrollDirection,
        layout: &impl LayoutProbe,
    ) -> Option<VisibleBand> {
        let count = layout.item_count();
        let columns = layout.column_count();
        if count == 0 || columns == 0 {
            return None;
        }

        let viewport = layout.viewport();
        let is_visible = |index: usize| {
            layout
                .item_rect(index)
                .is_some_and(|rect| partially_visible(&rect, &viewport))
        };
        let row_start = |index: usize| index - index % columns;
        let last = count - 1;

        let (min, max) = match direction {
            ScrollDirection::Down => {
                let start = self.band.map(|b| b.min).unwrap_or(0).min(last);
                let mut min = None;
                let mut max = None;

                let mut index = start;
                while index < count {
                    if is_visible(index) {
                        if min.is_none() {
                            min = Some(row_start(index));
                        }
                    } else if min.is_some() {
                        max = Some(row_start(index) - 1);
                        break;
                    }
                    index += columns;
                }

                if min.is_some() && max.is_none() {
                    max = Some(last);
                }
                (min, max)
            }
            ScrollDirection::Up => {
                let start = self.band.map(|b| b.max).unwrap_or(last).min(last);
                let mut min = None;
                let mut max = None;

                let mut index = Some(start);
                while let Some(i) = index {
                    if is_visible(i) {
                        if max.is_none() {
                            max = Some((row_start(i) + columns - 1).min(last));
                        }
                    } else if max.is_some() {
                        min = Some(row_start(i) + columns);
                        break;
                    }
                    index = i.checked_sub(columns);
                }

                if max.is_some() && min.is_none() {
                    min = Some(0);
                }
                (min, max)
            }
        };

        let (Some(min), Some(max)) = (min, max) else {
            return None;
        };

        self.ever_visible.extend(min..=max);

        let band = VisibleBand {
            min: row_start(min),
            max: (row_start(max) + columns - 1).min(last),
        };
        self.band = Some(band);
        Some(band)
    }
}
