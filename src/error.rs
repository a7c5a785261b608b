//! Error handling for the gridwm crate.

use std::{io, result};

use thiserror::Error;

use crate::app::state::SessionError;
use crate::config::ConfigError;
use crate::domain::grid::GridError;
use crate::domain::keyboard::KeyboardError;
use crate::domain::layout::LayoutError;
use crate::platform::WmError;
use crate::ui::renderer::RendererError;

/// Convenient result type for gridwm operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The window manager rejected a query or a move.
    #[error("Window manager error: {0}")]
    WindowManager(#[from] WmError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Keyboard error: {0}")]
    Keyboard(#[from] KeyboardError),

    #[error("Render error: {0}")]
    Render(#[from] RendererError),

    /// The requested backend isn't available on this platform.
    #[error("Backend '{0}' is not available on this platform")]
    UnsupportedBackend(&'static str),

    /// A line of session input couldn't be understood.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn invalid_input<M: Into<String>>(msg: M) -> Self {
        Self::InvalidInput(msg.into())
    }
}
