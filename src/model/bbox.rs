//! Integer bounding boxes in XYWH pixel form.

use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left corner plus size, in pixels.
///
/// The extractor only produces boxes with `0 <= x, y` and
/// `x + width <= image_width`, `y + height <= image_height`. Other producers
/// may not, so construction does not enforce it; see [`BoundingBox::clamp_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoundingBox {
    #[inline]
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from inclusive min/max pixel coordinates.
    #[inline]
    pub fn from_inclusive(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self::new(
            min_x as i64,
            min_y as i64,
            max_x as i64 - min_x as i64 + 1,
            max_y as i64 - min_y as i64 + 1,
        )
    }

    /// Exclusive right edge, saturating at the `i64` range.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at the `i64` range.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width.saturating_mul(self.height)
    }

    /// Returns true if the box lies fully inside a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 1
            && self.height >= 1
            && self.right() <= width as i64
            && self.bottom() <= height as i64
    }

    /// Clamps the box onto a non-empty canvas.
    ///
    /// `x` is pulled into `[0, canvas_width - 1]`, then `width` into
    /// `[1, canvas_width - x]`; the same applies vertically. The result
    /// always satisfies [`BoundingBox::fits_within`].
    pub fn clamp_to(&self, canvas_width: u32, canvas_height: u32) -> Self {
        let (x, width) = clamp_axis(self.x, self.width, canvas_width as i64);
        let (y, height) = clamp_axis(self.y, self.height, canvas_height as i64);
        Self::new(x, y, width, height)
    }
}

fn clamp_axis(start: i64, extent: i64, limit: i64) -> (i64, i64) {
    let start = start.min(limit - 1).max(0);
    let extent = extent.min(limit - start).max(1);
    (start, extent)
}
