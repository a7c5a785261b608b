//! User settings
//!
//! Grid size, margin and the layout directory, read from a JSON file with
//! defaults for everything left out.

pub mod settings;

pub use settings::{ConfigError, Settings};
