//! HSV conversion in the 8-bit convention used by most capture rigs'
//! calibration tables: `h` is degrees / 2 (`0..=179`), `s` and `v` span
//! `0..=255`.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::{Mask, Roi};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| c as f32);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let s = if max > 0.0 { diff * 255.0 / max } else { 0.0 };

        let mut h = if diff <= 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / diff
        } else if max == g {
            120.0 + 60.0 * (b - r) / diff
        } else {
            240.0 + 60.0 * (r - g) / diff
        };
        if h < 0.0 {
            h += 360.0;
        }

        // 360 degrees rounds onto 180, which wraps back to red.
        let h = ((h / 2.0).round() as u16 % 180) as u8;
        Self {
            h,
            s: s.round().clamp(0.0, 255.0) as u8,
            v: max as u8,
        }
    }
}

/// Inclusive, non-wrapping box in HSV space.
///
/// Hues that straddle 0/180 (red) are expressed as two ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lo: Hsv,
    pub hi: Hsv,
}

impl HsvRange {
    pub const fn new(lo: Hsv, hi: Hsv) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn contains(&self, p: Hsv) -> bool {
        (self.lo.h..=self.hi.h).contains(&p.h)
            && (self.lo.s..=self.hi.s).contains(&p.s)
            && (self.lo.v..=self.hi.v).contains(&p.v)
    }
}

/// Row-major HSV copy of an RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HsvImage {
    width: u32,
    height: u32,
    data: Vec<Hsv>,
}

impl HsvImage {
    pub fn from_rgb(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.pixels().map(|p| Hsv::from_rgb(p.0)).collect(),
        }
    }

    /// Image filled with a single HSV value.
    pub fn filled(width: u32, height: u32, value: Hsv) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Hsv {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Pixels inside `roi`, row by row. `roi` must lie inside the image.
    pub fn region(&self, roi: Roi) -> impl Iterator<Item = Hsv> + '_ {
        (roi.y_start..roi.y_end)
            .flat_map(move |y| (roi.x_start..roi.x_end).map(move |x| self.get(x, y)))
    }

    /// Mask of pixels falling inside `range`.
    pub fn in_range(&self, range: &HsvRange) -> Mask {
        Mask::from_fn(self.width, self.height, |x, y| range.contains(self.get(x, y)))
    }
}
