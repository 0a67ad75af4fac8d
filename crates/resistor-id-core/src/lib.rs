//! Core image, geometry and color primitives for resistor band decoding.
//!
//! This crate holds the pieces that do not know anything about resistors:
//! projective geometry, pixel sampling, HSV conversion, binary masks and
//! rectangular-kernel morphology. The band pipeline itself lives in
//! `resistor-id-bands`.

mod homography;
mod hsv;
mod logger;
mod mask;
mod morphology;
mod roi;
mod sampling;

pub use homography::{homography_from_4pt, warp_perspective_rgb, Homography};
pub use hsv::{Hsv, HsvImage, HsvRange};
pub use mask::Mask;
pub use morphology::{close, dilate, erode, open, RectKernel};
pub use roi::Roi;
pub use sampling::{sample_bilinear_rgb, sample_bilinear_rgb_u8};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
