//! Application orchestration layer
//!
//! Sessions turn raw input into drags; the controller turns drags into
//! window moves through the selected backend.

pub mod controller;
pub mod state;

pub use controller::SnapController;
pub use state::{Session, SessionError, SessionEvent, SessionOutcome};
