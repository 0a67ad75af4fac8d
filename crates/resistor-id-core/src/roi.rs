use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle with exclusive upper bounds.
///
/// Always non-empty: `x_start < x_end` and `y_start < y_end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl Roi {
    pub fn new(x_start: u32, x_end: u32, y_start: u32, y_end: u32) -> Option<Self> {
        (x_start < x_end && y_start < y_end).then_some(Self {
            x_start,
            x_end,
            y_start,
            y_end,
        })
    }

    /// Whole-image rectangle, `None` for an empty image.
    pub fn full(width: u32, height: u32) -> Option<Self> {
        Self::new(0, width, 0, height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x_start..self.x_end).contains(&x) && (self.y_start..self.y_end).contains(&y)
    }

    /// Shrink by `margin_x_frac * width` on the left and right and by
    /// `margin_y_frac * height` on top and bottom.
    ///
    /// Margins that would swallow an axis collapse it to its central pixel
    /// instead, so the result is never empty.
    pub fn shrink(&self, margin_x_frac: f32, margin_y_frac: f32) -> Self {
        let (x_start, x_end) = shrink_axis(self.x_start, self.x_end, margin_x_frac);
        let (y_start, y_end) = shrink_axis(self.y_start, self.y_end, margin_y_frac);
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Intersection with a `width x height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        Self::new(
            self.x_start,
            self.x_end.min(width),
            self.y_start,
            self.y_end.min(height),
        )
    }
}

fn shrink_axis(start: u32, end: u32, frac: f32) -> (u32, u32) {
    let len = end - start;
    let margin = (len as f32 * frac.max(0.0)) as u32;
    if margin.saturating_mul(2) < len {
        (start + margin, end - margin)
    } else {
        let mid = start + len / 2;
        (mid, mid + 1)
    }
}
