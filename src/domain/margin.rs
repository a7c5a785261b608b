//! Edge margin correction
//!
//! Moves a monitor-relative target into absolute screen coordinates, shrinks
//! it by the configured margin and nudges it away from monitor edges it ends
//! up hugging. Scaling and truncation in the snap step leave a few pixels of
//! slack against panels and screen borders; the nudge closes the common cases.
//!
//! The height and bottom-distance formulas subtract/compare against the
//! monitor's y origin and height in a way that is not symmetric with the
//! horizontal ones. Windows land where users expect them with these exact
//! formulas, so they are kept as they are.

use tracing::debug;

use crate::domain::core::Rect;

/// Margin settings applied to every snap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginCorrector {
    /// Gap kept around a snapped window, in screen pixels
    margin: i32,
    /// Grid blocks per side; sets the nudge step to `margin / (blocks / 4)`
    blocks: u32,
}

/// Which edges were nudged during a correction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeNudges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl MarginCorrector {
    pub fn new(margin: i32, blocks: u32) -> Self {
        Self { margin, blocks }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Size of a single edge nudge
    pub fn nudge(&self) -> f64 {
        self.margin as f64 / (self.blocks as f64 / 4.0)
    }

    /// Returns the absolute screen rectangle for a monitor-relative target
    ///
    /// # Arguments
    /// * `rect` - Target in monitor space, as produced by the snap transform
    /// * `region` - Available area of the monitor the session runs on
    pub fn correct(&self, rect: &Rect, region: &Rect) -> Rect {
        self.correct_with_nudges(rect, region).0
    }

    /// Same as [`MarginCorrector::correct`], also reporting which edges fired
    pub fn correct_with_nudges(&self, rect: &Rect, region: &Rect) -> (Rect, EdgeNudges) {
        let half = self.margin as f64 / 2.0;
        let tx = (region.x as f64 + rect.x as f64 + half) as i32;
        let ty = (rect.y as f64 + half) as i32 + region.y;
        let tw = rect.w - self.margin;
        let th = rect.h - self.margin - region.y;

        let dist_left = (tx - region.x).abs();
        let dist_right = ((tx + tw) - (region.x + region.w)).abs();
        let dist_top = (ty - region.y).abs();
        let dist_bottom = ((ty + th) - region.h).abs();

        let nudges = EdgeNudges {
            left: dist_left < self.margin,
            right: dist_right < self.margin,
            top: dist_top < self.margin,
            bottom: dist_bottom < self.margin,
        };

        let step = self.nudge();
        let mut x = tx as f64;
        let mut y = ty as f64;
        if nudges.left {
            x += step;
        }
        if nudges.right {
            x -= step;
        }
        if nudges.top {
            y += step;
        }
        if nudges.bottom {
            y -= step;
        }

        let corrected = Rect::new(x as i32, y as i32, tw, th);
        debug!(%rect, %region, %corrected, ?nudges, "applied margin correction");
        (corrected, nudges)
    }
}
