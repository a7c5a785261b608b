//! Drag selection on the grid surface
//!
//! Tracks one drag gesture from pointer-down to release. The current drag
//! rectangle is always normalized: its origin is the minimum corner and its
//! width and height are never negative.

use crate::domain::core::{Point, Rect};

/// Errors that can occur during selection operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A move arrived before any pointer-down
    #[error("Pointer moved before a drag was started")]
    NoDragStarted,
    /// The selection was already consumed
    #[error("Selection has already been consumed")]
    AlreadyConsumed,
}

/// State of the current drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing pressed yet
    Idle,
    /// Pointer is down; `drag` is the normalized rectangle so far
    Dragging { anchor: Point, drag: Rect },
    /// The drag was handed off to the snapper
    Consumed,
}

/// Drag selection for a single grid session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    state: SelectionState,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    /// Creates a selection with no drag
    ///
    /// # Example
    /// ```rust
    /// use gridwm::domain::{core::Rect, selection::Selection};
    ///
    /// let selection = Selection::new();
    /// assert_eq!(selection.drag(), Rect::UNSET);
    /// ```
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Returns the current drag, or [`Rect::UNSET`] if there is none
    pub fn drag(&self) -> Rect {
        match self.state {
            SelectionState::Dragging { drag, .. } => drag,
            _ => Rect::UNSET,
        }
    }

    /// Records the pointer-down position
    ///
    /// The drag stays empty until the pointer moves.
    pub fn press(&mut self, at: Point) -> Result<(), SelectionError> {
        if self.state == SelectionState::Consumed {
            return Err(SelectionError::AlreadyConsumed);
        }

        self.state = SelectionState::Dragging {
            anchor: at,
            drag: Rect::from_corners(at, at),
        };
        Ok(())
    }

    /// Updates the opposite corner of the drag
    pub fn move_to(&mut self, at: Point) -> Result<Rect, SelectionError> {
        match self.state {
            SelectionState::Dragging { anchor, .. } => {
                let drag = Rect::from_corners(anchor, at);
                self.state = SelectionState::Dragging { anchor, drag };
                Ok(drag)
            }
            SelectionState::Idle => Err(SelectionError::NoDragStarted),
            SelectionState::Consumed => Err(SelectionError::AlreadyConsumed),
        }
    }

    /// Replaces the drag with a fixed rectangle, as preset actions do
    pub fn set_drag(&mut self, drag: Rect) -> Result<(), SelectionError> {
        if self.state == SelectionState::Consumed {
            return Err(SelectionError::AlreadyConsumed);
        }

        self.state = SelectionState::Dragging {
            anchor: drag.origin(),
            drag,
        };
        Ok(())
    }

    /// Takes the drag out of the selection
    ///
    /// Can only happen once; returns [`Rect::UNSET`] if nothing was dragged.
    pub fn consume(&mut self) -> Result<Rect, SelectionError> {
        if self.state == SelectionState::Consumed {
            return Err(SelectionError::AlreadyConsumed);
        }

        let drag = self.drag();
        self.state = SelectionState::Consumed;
        Ok(drag)
    }
}
