//! Keyboard cursor over the hit grid.

use crate::layout::Align;
use crate::search::SearchSession;

/// Arrow-key movement in a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
}

impl CursorMove {
    /// Moving up or left aligns to the near edge, everything else the far edge.
    pub fn align(&self) -> Align {
        match self {
            CursorMove::Up | CursorMove::Left => Align::Near,
            CursorMove::Right | CursorMove::Down => Align::Far,
        }
    }

    fn apply(&self, index: usize, columns: usize, len: usize) -> Option<usize> {
        let target = match self {
            CursorMove::Left => index.checked_sub(1)?,
            CursorMove::Right => index + 1,
            CursorMove::Up => index.checked_sub(columns)?,
            CursorMove::Down => index + columns,
        };
        (target < len).then_some(target)
    }
}

/// Request for the layout to bring an item into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
    pub align: Align,
}

/// Holds the selected hit by id. Cleared whenever results are replaced.
#[derive(Debug, Default)]
pub struct GridNavigator {
    selected: Option<String>,
}

impl GridNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self, session: &SearchSession) -> Option<usize> {
        self.selected.as_deref().and_then(|id| session.index_of(id))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Move the cursor. With nothing selected the first hit is selected.
    ///
    /// Moves that would leave the grid are rejected and return `None`
    /// without touching the selection.
    pub fn move_cursor(
        &mut self,
        direction: CursorMove,
        columns: usize,
        session: &SearchSession,
    ) -> Option<ScrollRequest> {
        let target = match self.selected_index(session) {
            None if session.is_empty() => return None,
            None => 0,
            Some(index) => direction.apply(index, columns, session.len())?,
        };

        self.selected = Some(session.hit(target)?.id.clone());
        Some(ScrollRequest {
            index: target,
            align: direction.align(),
        })
    }

    /// Select the hit at `index` directly (mouse click).
    pub fn select(&mut self, index: usize, session: &SearchSession) -> bool {
        match session.hit(index) {
            Some(hit) => {
                self.selected = Some(hit.id.clone());
                true
            }
            None => false,
        }
    }
}
