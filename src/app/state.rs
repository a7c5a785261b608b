//! Grid session state
//!
//! A session is one showing of the grid: it starts with no drag and ends the
//! first time a terminal event arrives (release, preset key, escape or
//! export). The session owns its drag selection outright.

use tracing::trace;

use crate::domain::core::{Point, Rect, Size};
use crate::domain::keyboard::{action_for_key, Key, KeyAction, KeyboardError};
use crate::domain::selection::{Selection, SelectionError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session has already finished")]
    Finished,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Keyboard(#[from] KeyboardError),
}

/// Input delivered to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Key(Key),
    /// Save the current desktop as a named layout instead of snapping
    Export(String),
}

/// What the caller should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Keep feeding events
    Continue,
    /// Snap to this drag; [`Rect::UNSET`] means nothing was selected
    Completed(Rect),
    /// Close without touching any window
    Cancelled,
    /// Close and export the layout under this name
    Export(String),
}

impl SessionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionOutcome::Continue)
    }
}

/// One grid session
#[derive(Debug, Clone)]
pub struct Session {
    surface: Size,
    selection: Selection,
    finished: bool,
}

impl Session {
    /// Starts a session on a grid surface of `surface` size
    pub fn new(surface: Size) -> Self {
        Self {
            surface,
            selection: Selection::new(),
            finished: false,
        }
    }

    /// Current drag, or [`Rect::UNSET`]
    pub fn drag(&self) -> Rect {
        self.selection.drag()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Processes one event
    ///
    /// Pointer motion with no button held is ignored. Unbound keys are an
    /// error but leave the session running.
    pub fn handle(&mut self, event: SessionEvent) -> Result<SessionOutcome, SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }

        trace!(?event, "session event");
        let outcome = match event {
            SessionEvent::PointerDown(at) => {
                self.selection.press(at)?;
                SessionOutcome::Continue
            }
            SessionEvent::PointerMove(at) => match self.selection.move_to(at) {
                Ok(_) | Err(SelectionError::NoDragStarted) => SessionOutcome::Continue,
                Err(err) => return Err(err.into()),
            },
            SessionEvent::PointerUp => SessionOutcome::Completed(self.selection.consume()?),
            SessionEvent::Key(key) => match action_for_key(key)? {
                KeyAction::Cancel => SessionOutcome::Cancelled,
                KeyAction::Snap(preset) => {
                    self.selection.set_drag(preset.drag_rect(self.surface))?;
                    SessionOutcome::Completed(self.selection.consume()?)
                }
            },
            SessionEvent::Export(name) => SessionOutcome::Export(name),
        };

        self.finished = outcome.is_terminal();
        Ok(outcome)
    }
}
