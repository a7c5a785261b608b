//! Grid window snapper
//!
//! Drag across a coarse grid to size the active window to the cells you
//! touched, or save and restore whole-desktop window layouts by window
//! class.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod platform;
pub mod ui;

pub use error::{Error, Result};
