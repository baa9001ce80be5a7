//! Viewport probing for grid items.
//!
//! Rectangles are expressed in terminal cells relative to the viewport
//! origin. Items scrolled above or left of the viewport have negative
//! coordinates, so everything here is signed.

/// Bounding box of an on-screen item. `bottom` and `right` are exclusive
/// edges, the same way a DOM bounding rect reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl ItemRect {
    pub fn new(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            bottom: top + height,
            right: left + width,
        }
    }
}

/// Size of the visible area items are probed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// True if the item lies entirely inside the viewport.
pub fn fully_visible(rect: &ItemRect, viewport: &Viewport) -> bool {
    rect.top >= 0
        && rect.left >= 0
        && rect.bottom <= viewport.height
        && rect.right <= viewport.width
}

/// True if the item's bounding box touches the viewport at all.
pub fn partially_visible(rect: &ItemRect, viewport: &Viewport) -> bool {
    rect.bottom >= 0 && rect.right >= 0 && rect.top <= viewport.height && rect.left <= viewport.width
}
