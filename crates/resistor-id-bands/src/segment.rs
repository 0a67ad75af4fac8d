//! Background removal: isolate the resistor body from the backdrop.

use image::{Rgb, RgbImage};
use resistor_id_core::{close, open, Hsv, HsvImage, HsvRange, Mask, RectKernel};
use serde::{Deserialize, Serialize};

use crate::contour::largest_component_filled;

/// Value written over every non-body pixel of the cleaned image.
pub const FLATTENED_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Backdrop hue range; everything outside it is a body candidate.
    pub background: HsvRange,
    /// Wide, short kernel for the close-then-open cleanup.
    pub kernel: RectKernel,
    /// Fail instead of falling back to an all-foreground mask.
    pub reject_degraded: bool,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            background: HsvRange::new(Hsv::new(90, 60, 30), Hsv::new(130, 255, 255)),
            kernel: RectKernel::new(25, 7),
            reject_degraded: false,
        }
    }
}

/// Cleaned image plus the mask marking the resistor body.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedBody {
    pub image: RgbImage,
    pub mask: Mask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationQuality {
    /// A single body component was found.
    Isolated,
    /// Nothing survived cleanup; the whole frame is treated as body.
    Degraded,
}

/// Outcome of background removal.
///
/// The degraded variant still carries a well-formed body (original image,
/// all-foreground mask) so later stages can run, but callers can tell it
/// apart from a validated one.
#[derive(Clone, Debug, PartialEq)]
pub enum Segmentation {
    Isolated(SegmentedBody),
    Degraded(SegmentedBody),
}

impl Segmentation {
    pub fn body(&self) -> &SegmentedBody {
        match self {
            Segmentation::Isolated(b) | Segmentation::Degraded(b) => b,
        }
    }

    pub fn into_body(self) -> SegmentedBody {
        match self {
            Segmentation::Isolated(b) | Segmentation::Degraded(b) => b,
        }
    }

    pub fn quality(&self) -> SegmentationQuality {
        match self {
            Segmentation::Isolated(_) => SegmentationQuality::Isolated,
            Segmentation::Degraded(_) => SegmentationQuality::Degraded,
        }
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Segmentation::Degraded(_))
    }
}

/// Separate the resistor body from the backdrop.
pub fn segment_body(image: &RgbImage, params: &SegmentParams) -> Segmentation {
    let hsv = HsvImage::from_rgb(image);
    let candidates = hsv.in_range(&params.background).invert();
    let cleaned = open(&close(&candidates, params.kernel), params.kernel);

    match largest_component_filled(&cleaned) {
        Some(mask) => {
            log::debug!(
                "body isolated: {} of {} pixels",
                mask.count(),
                image.width() as usize * image.height() as usize
            );
            let image = flatten_background(image, &mask);
            Segmentation::Isolated(SegmentedBody { image, mask })
        }
        None => {
            log::warn!("no body component survived cleanup, using the whole frame");
            Segmentation::Degraded(SegmentedBody {
                image: image.clone(),
                mask: Mask::full(image.width(), image.height()),
            })
        }
    }
}

/// Copy of `image` with every pixel outside `mask` set to white.
pub fn flatten_background(image: &RgbImage, mask: &Mask) -> RgbImage {
    let mut out = image.clone();
    for (x, y, p) in out.enumerate_pixels_mut() {
        if !mask.get(x, y) {
            *p = FLATTENED_BACKGROUND;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKDROP: Rgb<u8> = Rgb([30, 60, 200]);
    const BODY: Rgb<u8> = Rgb([220, 190, 140]);
    // Blue band: shares the backdrop hue but sits inside the body.
    const BLUE_BAND: Rgb<u8> = Rgb([20, 40, 170]);

    fn scene() -> RgbImage {
        RgbImage::from_fn(200, 80, |x, y| {
            let in_body = (40..160).contains(&x) && (20..60).contains(&y);
            if in_body && (90..100).contains(&x) {
                BLUE_BAND
            } else if in_body {
                BODY
            } else if (5..8).contains(&x) && (5..8).contains(&y) {
                // speck of dust on the backdrop
                Rgb([200, 200, 200])
            } else {
                BACKDROP
            }
        })
    }

    #[test]
    fn isolates_body_and_whitens_backdrop() {
        let seg = segment_body(&scene(), &SegmentParams::default());
        assert_eq!(seg.quality(), SegmentationQuality::Isolated);

        let body = seg.body();
        let bb = body.mask.bounding_box().expect("body");
        assert_eq!((bb.x_start, bb.x_end, bb.y_start, bb.y_end), (40, 160, 20, 60));
        assert_eq!(body.image.get_pixel(0, 0), &FLATTENED_BACKGROUND);
        assert_eq!(body.image.get_pixel(6, 6), &FLATTENED_BACKGROUND);
        assert_eq!(body.image.get_pixel(50, 40), &BODY);
    }

    #[test]
    fn backdrop_colored_band_stays_part_of_the_body() {
        let seg = segment_body(&scene(), &SegmentParams::default());
        let body = seg.body();
        assert!(body.mask.get(95, 40));
        assert_eq!(body.image.get_pixel(95, 40), &BLUE_BAND);
    }

    #[test]
    fn backdrop_only_frame_degrades_to_full_mask() {
        let img = RgbImage::from_pixel(30, 20, BACKDROP);
        let seg = segment_body(&img, &SegmentParams::default());
        assert!(seg.is_degraded());
        let body = seg.into_body();
        assert_eq!(body.mask.count(), 600);
        assert_eq!(body.image, img);
    }
}
