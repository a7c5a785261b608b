//! Grid preview rendering
//!
//! Draws the grid surface the way the overlay shows it: cell outlines,
//! the cells under the current drag filled in, and the two centre axes.
//! Layout calculation is kept apart from rasterization so the geometry can
//! be tested without looking at pixels.

use std::path::Path;

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};

use crate::domain::core::Rect;
use crate::domain::grid::Grid;

/// Cell outline colour
pub const GRID_RGB: [u8; 3] = [80, 80, 80];
/// Surface background
pub const GRID_BG_RGB: [u8; 3] = [40, 40, 40];
/// Fill for cells under the drag
pub const REGION_RGB: [u8; 3] = [15, 15, 15];
/// Centre axis colour
pub const AXIS_RGB: [u8; 3] = [160, 160, 160];

fn color([r, g, b]: [u8; 3]) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Invalid preview dimensions: {width}x{height}")]
    InvalidGridDimensions { width: i32, height: i32 },

    #[error("Failed to write preview {path}: {message}")]
    SaveFailed { path: String, message: String },
}

/// A single line segment in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Color,
}

/// One grid cell in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellQuad {
    pub rect: Rect,
    /// Whether the cell is under the current drag
    pub highlighted: bool,
}

/// Pre-calculated geometry for one preview frame
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub cells: Vec<CellQuad>,
    /// Vertical then horizontal centre axis
    pub axes: Vec<Line>,
    pub canvas_width: i32,
    pub canvas_height: i32,
}

impl GridLayout {
    /// Builds the frame for `grid` with `drag` highlighted
    ///
    /// # Arguments
    /// * `grid` - Grid being previewed
    /// * `drag` - Current drag on the grid surface, or [`Rect::UNSET`]
    /// * `scale` - Canvas pixels per grid pixel (at least 1)
    pub fn from_grid(grid: &Grid, drag: &Rect, scale: u32) -> Self {
        let scale = scale.max(1) as i32;
        let surface = grid.surface();

        let cells = grid
            .cells()
            .map(|(_, cell)| CellQuad {
                rect: Rect::new(cell.x * scale, cell.y * scale, cell.w * scale, cell.h * scale),
                highlighted: cell.intersects(drag),
            })
            .collect();

        let (w, h) = ((surface.w * scale) as f32, (surface.h * scale) as f32);
        let axes = vec![
            Line {
                x1: w / 2.0,
                y1: 0.0,
                x2: w / 2.0,
                y2: h,
                color: color(AXIS_RGB),
            },
            Line {
                x1: 0.0,
                y1: h / 2.0,
                x2: w,
                y2: h / 2.0,
                color: color(AXIS_RGB),
            },
        ];

        Self {
            cells,
            axes,
            canvas_width: surface.w * scale,
            canvas_height: surface.h * scale,
        }
    }

    pub fn highlighted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.highlighted).count()
    }
}

/// Rasterizes [`GridLayout`] frames with tiny-skia
#[derive(Debug, Default)]
pub struct GridRenderer;

impl GridRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a frame into a new pixmap
    pub fn render_layout(&self, layout: &GridLayout) -> Result<Pixmap, RendererError> {
        if layout.canvas_width <= 0 || layout.canvas_height <= 0 {
            return Err(RendererError::InvalidGridDimensions {
                width: layout.canvas_width,
                height: layout.canvas_height,
            });
        }

        let mut pixmap = Pixmap::new(layout.canvas_width as u32, layout.canvas_height as u32)
            .ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(color(GRID_BG_RGB));

        self.render_cells(&mut pixmap, &layout.cells);
        self.render_lines(&mut pixmap, &layout.axes);

        Ok(pixmap)
    }

    fn render_cells(&self, pixmap: &mut Pixmap, cells: &[CellQuad]) {
        let mut fill = Paint::default();
        fill.set_color(color(REGION_RGB));

        let mut outline = Paint::default();
        outline.set_color(color(GRID_RGB));
        outline.anti_alias = false;
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };

        for cell in cells {
            let Some(rect) = SkiaRect::from_xywh(
                cell.rect.x as f32,
                cell.rect.y as f32,
                cell.rect.w as f32,
                cell.rect.h as f32,
            ) else {
                continue;
            };

            if cell.highlighted {
                pixmap.fill_rect(rect, &fill, Transform::identity(), None);
            }

            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
        }
    }

    fn render_lines(&self, pixmap: &mut Pixmap, lines: &[Line]) {
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };

        for line in lines {
            let mut pb = PathBuilder::new();
            pb.move_to(line.x1, line.y1);
            pb.line_to(line.x2, line.y2);

            if let Some(path) = pb.finish() {
                let mut paint = Paint::default();
                paint.set_color(line.color);
                paint.anti_alias = false;
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    /// Renders a frame and writes it as a PNG file
    pub fn save_png(&self, layout: &GridLayout, path: &Path) -> Result<(), RendererError> {
        let pixmap = self.render_layout(layout)?;
        pixmap
            .save_png(path)
            .map_err(|e| RendererError::SaveFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}
