use image::{GrayImage, Luma};

use crate::Roi;

/// Binary foreground mask congruent to an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    /// All-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// All-foreground mask.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![true; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Non-zero pixels of `img` become foreground.
    pub fn from_gray(img: &GrayImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw().iter().map(|&v| v > 0).collect(),
        }
    }

    /// 0/255 rendering, the layout contour tracers expect.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255 } else { 0 }])
        })
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
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let i = self.idx(x, y);
        self.data[i] = value;
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn invert(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| !v).collect(),
        }
    }

    /// Tight bounding box of the foreground, `None` when the mask is empty.
    pub fn bounding_box(&self) -> Option<Roi> {
        let mut x_min = u32::MAX;
        let mut y_min = u32::MAX;
        let mut x_max = 0u32;
        let mut y_max = 0u32;
        let mut any = false;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    any = true;
                    x_min = x_min.min(x);
                    y_min = y_min.min(y);
                    x_max = x_max.max(x);
                    y_max = y_max.max(y);
                }
            }
        }
        if !any {
            return None;
        }
        Roi::new(x_min, x_max + 1, y_min, y_max + 1)
    }

    /// First and one-past-last foreground row in column `x`.
    pub fn column_extent(&self, x: u32) -> Option<(u32, u32)> {
        if x >= self.width {
            return None;
        }
        let first = (0..self.height).find(|&y| self.get(x, y))?;
        let last = (0..self.height).rev().find(|&y| self.get(x, y))?;
        Some((first, last + 1))
    }
}
