//! Grid preview output

pub mod renderer;

pub use renderer::{GridLayout, GridRenderer, RendererError};
