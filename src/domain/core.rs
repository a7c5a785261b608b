//! Core domain types and operations
//!
//! This module defines the geometric primitives shared by every coordinate
//! space the snapper works in: grid-pixel space (the overlay surface),
//! monitor space (relative to a monitor's available area) and absolute
//! screen space (what the window manager understands).

use serde::{Deserialize, Serialize};

/// Rectangle in integer pixel coordinates
///
/// The same type is used in all three coordinate spaces. A rectangle with
/// zero or negative extent is empty and intersects nothing. The special
/// value [`Rect::UNSET`] marks "no drag has happened yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Reserved sentinel for "no selection"
    pub const UNSET: Rect = Rect {
        x: -1,
        y: -1,
        w: -1,
        h: -1,
    };

    /// Creates a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds the normalized rectangle spanned by two corner points
    ///
    /// The result always has its origin at the minimum corner and a
    /// non-negative width and height, whichever order the points come in.
    /// Sides too long for an `i32` saturate.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let span = |from: i32, to: i32| i32::try_from(from.abs_diff(to)).unwrap_or(i32::MAX);
        Self::new(a.x.min(b.x), a.y.min(b.y), span(a.x, b.x), span(a.y, b.y))
    }

    /// Returns the right edge coordinate (exclusive)
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Returns the bottom edge coordinate (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Returns the top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns true for the "no drag yet" sentinel
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    /// Returns true if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns true if both rectangles share at least one pixel
    ///
    /// Empty rectangles (including [`Rect::UNSET`]) never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Rect::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        ))
    }

    /// Returns the same rectangle moved by the given offset
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

/// A point in integer pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a drawing surface or window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_basic_properties() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
        assert_eq!(rect.origin(), Point::new(10, 20));
        assert!(!rect.is_empty());
        assert!(!rect.is_unset());
    }

    #[test]
    fn unset_sentinel_is_empty() {
        assert!(Rect::UNSET.is_unset());
        assert!(Rect::UNSET.is_empty());

        let everything = Rect::new(-1000, -1000, 5000, 5000);
        assert!(!Rect::UNSET.intersects(&everything));
        assert!(!everything.intersects(&Rect::UNSET));
    }

    #[test]
    fn rect_contains_point() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains_point(15, 15));
        assert!(rect.contains_point(10, 10));
        assert!(!rect.contains_point(30, 30));
        assert!(!rect.contains_point(5, 5));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        assert!(!left.intersects(&right));

        let overlap = Rect::new(9, 9, 10, 10);
        assert!(left.intersects(&overlap));
    }

    #[test]
    fn zero_extent_never_intersects() {
        let cell = Rect::new(0, 0, 10, 10);
        assert!(!cell.intersects(&Rect::new(5, 5, 0, 4)));
        assert!(!cell.intersects(&Rect::new(5, 5, 4, 0)));
    }

    #[test]
    fn rect_intersection() {
        let rect1 = Rect::new(0, 0, 20, 20);
        let rect2 = Rect::new(10, 10, 20, 20);
        assert_eq!(rect1.intersection(&rect2), Some(Rect::new(10, 10, 10, 10)));

        let rect3 = Rect::new(30, 30, 10, 10);
        assert!(rect1.intersection(&rect3).is_none());
    }

    #[test]
    fn from_corners_normalizes() {
        let forward = Rect::from_corners(Point::new(10, 20), Point::new(50, 80));
        let backward = Rect::from_corners(Point::new(50, 80), Point::new(10, 20));
        let mixed = Rect::from_corners(Point::new(50, 20), Point::new(10, 80));

        assert_eq!(forward, Rect::new(10, 20, 40, 60));
        assert_eq!(backward, forward);
        assert_eq!(mixed, forward);
    }

    #[test]
    fn edges_saturate_near_i32_max() {
        let far = Rect::new(i32::MAX - 5, i32::MAX - 5, 10, 10);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.bottom(), i32::MAX);
        assert!(!far.intersects(&Rect::new(0, 0, 200, 200)));

        let wide = Rect::from_corners(Point::new(i32::MIN, 0), Point::new(i32::MAX, 10));
        assert_eq!(wide, Rect::new(i32::MIN, 0, i32::MAX, 10));
    }

    #[test]
    fn display_uses_geometry_notation() {
        assert_eq!(Rect::new(5, -3, 800, 600).to_string(), "800x600+5+-3");
    }
}
