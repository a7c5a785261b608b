//! Grid geometry and cell calculations
//!
//! This module handles the logical grid drawn on the overlay surface. The
//! grid is always `blocks × blocks` square cells laid over a fixed-size
//! surface; it knows nothing about monitors.

use crate::domain::core::{Rect, Size};

/// Errors that can occur during grid operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Grid must have at least one block per side
    #[error("Invalid grid size: {blocks} blocks")]
    InvalidBlocks { blocks: u32 },

    /// Surface is too small to give every cell at least one pixel
    #[error("Surface {width}x{height} is too small for a {blocks}x{blocks} grid")]
    SurfaceTooSmall { width: i32, height: i32, blocks: u32 },

    /// Cells are square, so the surface has to be too
    #[error("Surface {width}x{height} is not square")]
    NonSquareSurface { width: i32, height: i32 },

    /// Grid coordinates are outside the valid range
    #[error("Cell ({row}, {col}) is outside a {blocks}x{blocks} grid")]
    InvalidCell { row: u32, col: u32, blocks: u32 },
}

/// Position of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

impl GridCell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A square grid over the overlay surface
///
/// Cells are `surface.w / blocks` pixels on each side (integer division), so
/// with a surface that isn't a multiple of `blocks` the last cells stop short
/// of the surface edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Number of cells along each side
    blocks: u32,
    /// Size of the overlay surface in grid pixels
    surface: Size,
    /// Side length of each cell in grid pixels
    cell_size: i32,
}

impl Grid {
    /// Default number of blocks per side
    pub const DEFAULT_BLOCKS: u32 = 20;

    /// Creates a new grid over a surface
    ///
    /// # Arguments
    /// * `blocks` - Number of cells per side (must be > 0)
    /// * `surface` - Size of the grid surface in pixels
    ///
    /// # Example
    /// ```rust
    /// use gridwm::domain::{core::Size, grid::Grid};
    ///
    /// let grid = Grid::new(20, Size::new(200, 200)).unwrap();
    /// assert_eq!(grid.cell_size(), 10);
    /// ```
    pub fn new(blocks: u32, surface: Size) -> Result<Self, GridError> {
        if blocks == 0 || blocks > i32::MAX as u32 {
            return Err(GridError::InvalidBlocks { blocks });
        }

        let cell_size = surface.w / blocks as i32;
        if cell_size <= 0 || surface.h <= 0 {
            return Err(GridError::SurfaceTooSmall {
                width: surface.w,
                height: surface.h,
                blocks,
            });
        }
        if surface.w != surface.h {
            return Err(GridError::NonSquareSurface {
                width: surface.w,
                height: surface.h,
            });
        }

        Ok(Self {
            blocks,
            surface,
            cell_size,
        })
    }

    /// Returns the number of cells per side
    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// Returns the surface size
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Returns the side length of each cell
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Converts a cell position to its rectangle on the surface
    pub fn cell_rect(&self, cell: GridCell) -> Result<Rect, GridError> {
        if cell.row >= self.blocks || cell.col >= self.blocks {
            return Err(GridError::InvalidCell {
                row: cell.row,
                col: cell.col,
                blocks: self.blocks,
            });
        }

        Ok(self.rect_unchecked(cell))
    }

    fn rect_unchecked(&self, cell: GridCell) -> Rect {
        Rect::new(
            cell.col as i32 * self.cell_size,
            cell.row as i32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Enumerates every cell with its rectangle
    ///
    /// The scan order is fixed: the outer loop walks columns left to right
    /// and the inner loop walks rows top to bottom. Snapping depends on this
    /// order, so it must not change.
    pub fn cells(&self) -> impl Iterator<Item = (GridCell, Rect)> + '_ {
        (0..self.blocks).flat_map(move |col| {
            (0..self.blocks).map(move |row| {
                let cell = GridCell::new(row, col);
                (cell, self.rect_unchecked(cell))
            })
        })
    }

    /// Returns the cells overlapping `drag`, in scan order
    ///
    /// An empty drag, including [`Rect::UNSET`], matches no cells.
    pub fn cells_intersecting(&self, drag: &Rect) -> Vec<(GridCell, Rect)> {
        self.cells()
            .filter(|(_, rect)| rect.intersects(drag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn default_grid() -> Grid {
        Grid::new(20, Size::new(200, 200)).unwrap()
    }

    #[test]
    fn grid_creation_valid() {
        let grid = default_grid();
        assert_eq!(grid.blocks(), 20);
        assert_eq!(grid.cell_size(), 10);
        assert_eq!(grid.surface(), Size::new(200, 200));
    }

    #[test]
    fn grid_creation_invalid() {
        assert_eq!(
            Grid::new(0, Size::new(200, 200)),
            Err(GridError::InvalidBlocks { blocks: 0 })
        );
        assert!(matches!(
            Grid::new(20, Size::new(19, 200)),
            Err(GridError::SurfaceTooSmall { .. })
        ));
        assert_eq!(
            Grid::new(20, Size::new(100, 200)),
            Err(GridError::NonSquareSurface {
                width: 100,
                height: 200
            })
        );
    }

    #[test]
    fn cell_size_truncates() {
        let grid = Grid::new(20, Size::new(290, 290)).unwrap();
        assert_eq!(grid.cell_size(), 14);
    }

    #[test]
    fn cell_rect_calculation() {
        let grid = default_grid();
        assert_eq!(grid.cell_rect(GridCell::new(0, 0)).unwrap(), Rect::new(0, 0, 10, 10));
        assert_eq!(grid.cell_rect(GridCell::new(2, 5)).unwrap(), Rect::new(50, 20, 10, 10));
        assert!(matches!(
            grid.cell_rect(GridCell::new(20, 0)),
            Err(GridError::InvalidCell { .. })
        ));
    }

    #[test]
    fn scan_order_is_column_outer() {
        let grid = Grid::new(2, Size::new(20, 20)).unwrap();
        let order: Vec<GridCell> = grid.cells().map(|(cell, _)| cell).collect();
        assert_eq!(
            order,
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(0, 1),
                GridCell::new(1, 1),
            ]
        );
    }

    #[test]
    fn cells_intersecting_quadrant() {
        let grid = default_grid();
        let hits = grid.cells_intersecting(&Rect::new(0, 0, 100, 100));
        assert_eq!(hits.len(), 100);
        assert!(hits.iter().all(|(cell, _)| cell.row < 10 && cell.col < 10));
    }

    #[test]
    fn cells_intersecting_single_pixel() {
        let grid = default_grid();
        let hits = grid.cells_intersecting(&Rect::new(15, 25, 1, 1));
        assert_eq!(hits, vec![(GridCell::new(2, 1), Rect::new(10, 20, 10, 10))]);
    }

    #[test]
    fn cells_intersecting_unset_is_empty() {
        assert!(default_grid().cells_intersecting(&Rect::UNSET).is_empty());
    }

    proptest! {
        #[test]
        fn unset_never_matches(blocks in 1u32..64, side in 64i32..4096) {
            let grid = Grid::new(blocks, Size::new(side, side)).unwrap();
            prop_assert!(grid.cells_intersecting(&Rect::UNSET).is_empty());
        }

        #[test]
        fn every_cell_is_in_bounds(blocks in 1u32..40, side in 40i32..2000) {
            let grid = Grid::new(blocks, Size::new(side, side)).unwrap();
            prop_assert_eq!(grid.cells().count(), (blocks * blocks) as usize);
            for (cell, rect) in grid.cells() {
                prop_assert!(cell.row < blocks && cell.col < blocks);
                prop_assert!(rect.right() <= side && rect.bottom() <= side);
            }
        }
    }
}
