//! Domain logic and core data structures
//!
//! Pure geometry and layout logic. Nothing here talks to a window manager
//! except through the [`crate::platform::WindowManager`] trait passed in.

pub mod core;
pub mod grid;
pub mod keyboard;
pub mod layout;
pub mod margin;
pub mod selection;
pub mod snap;
