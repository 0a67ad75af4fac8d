//! Binary morphology with axis-aligned rectangular structuring elements.
//!
//! Masks round-trip through 0/255 gray images and `imageproc`'s grayscale
//! operators, which skip pixels outside the image: erosion does not eat in
//! from the border and dilation does not grow from it.

use image::{GrayImage, Luma};
use imageproc::morphology::{
    grayscale_close, grayscale_dilate, grayscale_erode, grayscale_open,
    Mask as StructuringElement,
};
use serde::{Deserialize, Serialize};

use crate::Mask;

/// Largest side `imageproc` accepts for a structuring element image.
const MAX_KERNEL_SIDE: u32 = 511;

/// Rectangular structuring element anchored at `(width / 2, height / 2)`.
///
/// Sides are clamped to `1..=511` when the element is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectKernel {
    pub width: u32,
    pub height: u32,
}

impl RectKernel {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    fn element(self) -> StructuringElement {
        let w = self.width.clamp(1, MAX_KERNEL_SIDE);
        let h = self.height.clamp(1, MAX_KERNEL_SIDE);
        let filled = GrayImage::from_pixel(w, h, Luma([255]));
        // w / 2 and h / 2 are at most 255
        StructuringElement::from_image(&filled, (w / 2) as u8, (h / 2) as u8)
    }
}

fn apply(
    src: &Mask,
    kernel: RectKernel,
    op: fn(&GrayImage, &StructuringElement) -> GrayImage,
) -> Mask {
    if src.width() == 0 || src.height() == 0 {
        return src.clone();
    }
    Mask::from_gray(&op(&src.to_gray(), &kernel.element()))
}

pub fn erode(src: &Mask, kernel: RectKernel) -> Mask {
    apply(src, kernel, grayscale_erode)
}

pub fn dilate(src: &Mask, kernel: RectKernel) -> Mask {
    apply(src, kernel, grayscale_dilate)
}

/// Erosion then dilation: removes specks smaller than the kernel.
pub fn open(src: &Mask, kernel: RectKernel) -> Mask {
    apply(src, kernel, grayscale_open)
}

/// Dilation then erosion: bridges gaps narrower than the kernel.
pub fn close(src: &Mask, kernel: RectKernel) -> Mask {
    apply(src, kernel, grayscale_close)
}
