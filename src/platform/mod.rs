//! Window manager backends
//!
//! Everything that talks to the desktop goes through the [`WindowManager`]
//! trait. The X11 backend drives the usual command-line tools; the Win32
//! backend calls the OS directly and is only compiled on Windows.

use std::fmt;
use std::io;

use crate::domain::core::{Point, Rect};

pub mod x11;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub mod recording;

/// Opaque window identifier owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A top-level window as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    /// Window class used to match windows across sessions (not unique)
    pub class: String,
    /// Bounds in absolute screen coordinates
    pub bounds: Rect,
}

/// One connected monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Full monitor rectangle in screen coordinates
    pub geometry: Rect,
    /// Usable area, excluding panels and docks
    pub available: Rect,
}

impl Monitor {
    /// Monitor whose available area is the full geometry
    pub fn new(geometry: Rect) -> Self {
        Self {
            geometry,
            available: geometry,
        }
    }

    /// Monitor with a reserved panel area
    pub fn with_available(geometry: Rect, available: Rect) -> Self {
        Self {
            geometry,
            available,
        }
    }
}

/// Error types for window manager operations
#[derive(Debug, thiserror::Error)]
pub enum WmError {
    /// No window currently has focus
    #[error("No active window found")]
    NoActiveWindow,

    /// The backend reported no monitors
    #[error("No monitors found")]
    NoMonitors,

    /// An external tool could not be started
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// An external tool exited unsuccessfully
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Output from the backend did not have the expected shape
    #[error("Could not parse {what} from {output:?}")]
    Parse { what: &'static str, output: String },

    /// Window handle no longer refers to a window
    #[error("Window {0} does not exist")]
    InvalidWindow(WindowId),

    /// The OS refused to move or resize the window
    #[error("Failed to position window {0}")]
    PositionFailed(WindowId),
}

/// Capabilities the snapper needs from the desktop
///
/// All calls are synchronous: they complete or fail before returning.
pub trait WindowManager {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Returns the focused window
    fn active_window(&self) -> Result<WindowId, WmError>;

    /// Lists top-level windows with their class and bounds
    fn list_windows(&self) -> Result<Vec<WindowInfo>, WmError>;

    /// Returns a window's bounds in screen coordinates
    fn window_bounds(&self, id: WindowId) -> Result<Rect, WmError>;

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), WmError>;

    fn resize_window(&self, id: WindowId, w: i32, h: i32) -> Result<(), WmError>;

    /// Moves and resizes in a single request
    fn set_window_bounds(&self, id: WindowId, bounds: Rect) -> Result<(), WmError>;

    /// Returns monitors in a stable order
    fn monitors(&self) -> Result<Vec<Monitor>, WmError>;

    /// Returns the pointer position in screen coordinates
    fn pointer_position(&self) -> Result<Point, WmError>;

    /// Returns the index of the monitor under the pointer
    ///
    /// Falls back to the first monitor when the pointer is outside all of
    /// them.
    fn monitor_of_pointer(&self) -> Result<usize, WmError> {
        let pointer = self.pointer_position()?;
        let monitors = self.monitors()?;
        if monitors.is_empty() {
            return Err(WmError::NoMonitors);
        }

        Ok(monitor_index_at(&monitors, pointer).unwrap_or(0))
    }
}

/// Finds the monitor whose full geometry contains `point`
pub fn monitor_index_at(monitors: &[Monitor], point: Point) -> Option<usize> {
    monitors
        .iter()
        .position(|m| m.geometry.contains_point(point.x, point.y))
}
