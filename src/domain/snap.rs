//! Snapping a drag gesture to grid cells and scaling it onto a monitor
//!
//! A drag on the overlay surface is first widened to the cells it touches
//! and then mapped linearly from surface pixels into the monitor's available
//! area. The result is relative to the monitor; [`crate::domain::margin`]
//! turns it into absolute screen coordinates.

use tracing::debug;

use crate::domain::core::{Rect, Size};
use crate::domain::grid::Grid;

/// Snaps `drag` to the cells it overlaps
///
/// The first overlapping cell in the grid's scan order anchors the top-left
/// corner; every later overlapping cell stretches the width and height out to
/// its own far edge. Returns `None` when no cell overlaps, which is always the
/// case for [`Rect::UNSET`].
pub fn snap_to_cells(grid: &Grid, drag: &Rect) -> Option<Rect> {
    let mut snapped: Option<Rect> = None;

    for (_, cell) in grid.cells().filter(|(_, cell)| cell.intersects(drag)) {
        let anchor = snapped.get_or_insert(Rect::new(cell.x, cell.y, 0, 0));
        anchor.w = (cell.right() - anchor.x).abs();
        anchor.h = (cell.bottom() - anchor.y).abs();
    }

    snapped
}

/// Maps a grid-surface rectangle into monitor space
///
/// Position and size are each scaled on their own, in `f64`, and truncated
/// toward zero.
pub fn rescale(snapped: &Rect, surface: Size, region: &Rect) -> Rect {
    let scale = |value: i32, from: i32, to: i32| (value as f64 / from as f64 * to as f64) as i32;

    Rect::new(
        scale(snapped.x, surface.w, region.w),
        scale(snapped.y, surface.h, region.h),
        scale(snapped.w, surface.w, region.w),
        scale(snapped.h, surface.h, region.h),
    )
}

/// Grid-to-monitor transform fixed for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapTransform {
    grid: Grid,
    region: Rect,
}

impl SnapTransform {
    /// Creates a transform for `grid` onto the monitor's available `region`
    pub fn new(grid: Grid, region: Rect) -> Self {
        Self { grid, region }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Snaps and rescales a drag in one step
    ///
    /// # Returns
    /// The monitor-relative target rectangle, or `None` for an empty selection
    pub fn apply(&self, drag: &Rect) -> Option<Rect> {
        let snapped = snap_to_cells(&self.grid, drag)?;
        let scaled = rescale(&snapped, self.grid.surface(), &self.region);
        debug!(%drag, %snapped, %scaled, "snapped drag to grid");
        Some(scaled)
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
    fn quadrant_example() {
        let transform = SnapTransform::new(default_grid(), Rect::new(0, 0, 1920, 1080));
        let snapped = snap_to_cells(transform.grid(), &Rect::new(0, 0, 100, 100));
        assert_eq!(snapped, Some(Rect::new(0, 0, 100, 100)));
        assert_eq!(
            transform.apply(&Rect::new(0, 0, 100, 100)),
            Some(Rect::new(0, 0, 960, 540))
        );
    }

    #[test]
    fn unset_drag_snaps_to_nothing() {
        let transform = SnapTransform::new(default_grid(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(snap_to_cells(transform.grid(), &Rect::UNSET), None);
        assert_eq!(transform.apply(&Rect::UNSET), None);
    }

    #[test]
    fn zero_size_drag_snaps_to_nothing() {
        assert_eq!(snap_to_cells(&default_grid(), &Rect::new(42, 42, 0, 0)), None);
    }

    #[test]
    fn far_off_surface_drag_snaps_to_nothing() {
        let grid = default_grid();
        assert_eq!(snap_to_cells(&grid, &Rect::new(i32::MAX - 5, 0, 10, 10)), None);
        assert_eq!(snap_to_cells(&grid, &Rect::new(0, i32::MAX, i32::MAX, i32::MAX)), None);
    }

    #[test]
    fn huge_drag_from_inside_covers_the_rest() {
        let grid = default_grid();
        assert_eq!(
            snap_to_cells(&grid, &Rect::new(150, 150, i32::MAX, i32::MAX)),
            Some(Rect::new(150, 150, 50, 50))
        );
    }

    #[test]
    fn partial_cells_are_included() {
        // 15..36 touches cells starting at 10, 20 and 30
        let snapped = snap_to_cells(&default_grid(), &Rect::new(15, 15, 21, 21));
        assert_eq!(snapped, Some(Rect::new(10, 10, 30, 30)));
    }

    #[test]
    fn rescale_uses_each_axis() {
        let scaled = rescale(
            &Rect::new(100, 0, 100, 200),
            Size::new(200, 200),
            &Rect::new(0, 0, 1920, 1080),
        );
        assert_eq!(scaled, Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn rescale_truncates() {
        // 10/290 * 1366 = 47.1..
        let scaled = rescale(
            &Rect::new(10, 10, 10, 10),
            Size::new(290, 290),
            &Rect::new(0, 0, 1366, 768),
        );
        assert_eq!(scaled, Rect::new(47, 26, 47, 26));
    }

    #[test]
    fn doubling_region_width_doubles_output() {
        let drag = Rect::new(50, 0, 100, 200);
        let single = SnapTransform::new(default_grid(), Rect::new(0, 0, 1920, 1080));
        let double = SnapTransform::new(default_grid(), Rect::new(0, 0, 3840, 1080));
        assert_eq!(single.apply(&drag), Some(Rect::new(480, 0, 960, 1080)));
        assert_eq!(double.apply(&drag), Some(Rect::new(960, 0, 1920, 1080)));
    }

    #[test]
    fn offset_region_is_not_added_here() {
        let transform = SnapTransform::new(default_grid(), Rect::new(1920, 0, 1920, 1080));
        assert_eq!(
            transform.apply(&Rect::new(100, 0, 100, 200)),
            Some(Rect::new(960, 0, 960, 1080))
        );
    }

    proptest! {
        #[test]
        fn drag_inside_one_cell_snaps_to_that_cell(
            row in 0u32..20,
            col in 0u32..20,
            dx in 0i32..10,
            dy in 0i32..10,
            w in 1i32..10,
            h in 1i32..10,
        ) {
            let grid = default_grid();
            let cell = grid.cell_rect(crate::domain::grid::GridCell::new(row, col)).unwrap();
            let w = w.min(10 - dx);
            let h = h.min(10 - dy);
            prop_assume!(w > 0 && h > 0);
            let drag = Rect::new(cell.x + dx, cell.y + dy, w, h);
            prop_assert_eq!(snap_to_cells(&grid, &drag), Some(cell));
        }

        #[test]
        fn span_covers_whole_cells(
            r0 in 0u32..20,
            c0 in 0u32..20,
            rows in 1u32..20,
            cols in 1u32..20,
            blocks in prop::sample::select(vec![4u32, 8, 20]),
        ) {
            let grid = Grid::new(blocks, Size::new(290, 290)).unwrap();
            let r0 = r0 % blocks;
            let c0 = c0 % blocks;
            let r1 = (r0 + rows - 1).min(blocks - 1);
            let c1 = (c0 + cols - 1).min(blocks - 1);
            let size = grid.cell_size();

            // drag from the middle of the first cell to the middle of the last
            let drag = Rect::new(
                c0 as i32 * size + size / 2,
                r0 as i32 * size + size / 2,
                (c1 - c0) as i32 * size + 1,
                (r1 - r0) as i32 * size + 1,
            );
            let snapped = snap_to_cells(&grid, &drag).unwrap();
            prop_assert_eq!(snapped.x, c0 as i32 * size);
            prop_assert_eq!(snapped.y, r0 as i32 * size);
            prop_assert_eq!(snapped.w, (c1 - c0 + 1) as i32 * size);
            prop_assert_eq!(snapped.h, (r1 - r0 + 1) as i32 * size);
        }

        #[test]
        fn doubling_width_doubles_x_and_w(
            x in 0i32..200,
            w in 0i32..200,
            width in 1i32..4000,
        ) {
            let surface = Size::new(200, 200);
            let snapped = Rect::new(x, 0, w, 10);
            let single = rescale(&snapped, surface, &Rect::new(0, 0, width, 1000));
            let double = rescale(&snapped, surface, &Rect::new(0, 0, width * 2, 1000));
            // truncation can lose at most one pixel of the doubled value
            prop_assert!((double.x - single.x * 2).abs() <= 1);
            prop_assert!((double.w - single.w * 2).abs() <= 1);
        }
    }
}
