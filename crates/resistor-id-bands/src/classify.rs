//! Per-band color classification against the static HSV palette.

use image::RgbImage;
use resistor_id_core::{Hsv, HsvImage, Mask, Roi};
use serde::{Deserialize, Serialize};

use crate::color::{ColorLabel, ASSUMED_TOLERANCE_COLOR};
use crate::locate::BandPosition;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Width of the sampling window centred on each band position.
    pub window_width: u32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self { window_width: 15 }
    }
}

/// Sampling box for the band at column `x`.
///
/// Horizontally `window_width` columns starting `window_width / 2` left of
/// `x`, clipped to the image. Vertically the body extent of the mask column
/// at `x`, or the middle third of the image when that column is empty.
pub fn sample_window(mask: &Mask, x: u32, params: &ClassifierParams) -> Option<Roi> {
    let (w, h) = (mask.width(), mask.height());
    let width = params.window_width.max(1) as i64;
    let start = x as i64 - width / 2;
    let x_start = start.max(0) as u32;
    let x_end = (start + width).clamp(0, w as i64) as u32;
    let (y_start, y_end) = mask.column_extent(x).unwrap_or_else(|| middle_third(h));
    Roi::new(x_start, x_end, y_start, y_end)
}

fn middle_third(height: u32) -> (u32, u32) {
    if height < 3 {
        (0, height)
    } else {
        (height / 3, 2 * height / 3)
    }
}

/// Palette color with the strictly largest number of matching pixels.
///
/// Earlier palette entries win ties; `Unknown` when nothing matches.
pub fn classify_region(pixels: impl IntoIterator<Item = Hsv>) -> ColorLabel {
    let mut counts = [0usize; ColorLabel::PALETTE.len()];
    for p in pixels {
        for (count, color) in counts.iter_mut().zip(ColorLabel::PALETTE) {
            if color.matches(p) {
                *count += 1;
            }
        }
    }

    let mut best = ColorLabel::Unknown;
    let mut best_count = 0;
    for (count, color) in counts.into_iter().zip(ColorLabel::PALETTE) {
        if count > best_count {
            best = color;
            best_count = count;
        }
    }
    best
}

/// Classify every position, in order. Positions whose window falls outside
/// the image are `Unknown`.
pub fn classify_bands(
    image: &RgbImage,
    mask: &Mask,
    positions: &[BandPosition],
    params: &ClassifierParams,
) -> Vec<ColorLabel> {
    let hsv = HsvImage::from_rgb(image);
    positions
        .iter()
        .map(|p| match sample_window(mask, p.x, params) {
            Some(roi) => classify_region(hsv.region(roi)),
            None => ColorLabel::Unknown,
        })
        .collect()
}

/// Colors for the tolerance positions. These bands are not sampled; each is
/// assigned [`ASSUMED_TOLERANCE_COLOR`].
pub fn tolerance_colors(positions: &[BandPosition]) -> Vec<ColorLabel> {
    vec![ASSUMED_TOLERANCE_COLOR; positions.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_low_red_region_is_red() {
        let hsv = HsvImage::filled(20, 10, Hsv::new(4, 200, 200));
        for color in ColorLabel::PALETTE {
            if color != ColorLabel::Red {
                assert!(!color.matches(Hsv::new(4, 200, 200)), "{color}");
            }
        }
        let roi = Roi::full(20, 10).expect("roi");
        assert_eq!(classify_region(hsv.region(roi)), ColorLabel::Red);
    }

    #[test]
    fn unmatched_region_is_unknown() {
        let pixels = std::iter::repeat(Hsv::new(160, 35, 160)).take(50);
        assert_eq!(classify_region(pixels), ColorLabel::Unknown);
        assert_eq!(classify_region(std::iter::empty()), ColorLabel::Unknown);
    }

    #[test]
    fn majority_wins() {
        let black = std::iter::repeat(Hsv::new(0, 0, 10)).take(10);
        let green = std::iter::repeat(Hsv::new(60, 200, 200)).take(11);
        assert_eq!(classify_region(black.chain(green)), ColorLabel::Green);
    }

    #[test]
    fn window_is_centred_and_clipped() {
        let mask = Mask::from_fn(100, 40, |_, y| (10..30).contains(&y));
        let params = ClassifierParams::default();

        let roi = sample_window(&mask, 50, &params).expect("window");
        assert_eq!(roi, Roi::new(43, 58, 10, 30).expect("valid"));
        assert_eq!(roi.width(), 15);

        let left = sample_window(&mask, 2, &params).expect("window");
        assert_eq!((left.x_start, left.x_end), (0, 10));
        let right = sample_window(&mask, 97, &params).expect("window");
        assert_eq!((right.x_start, right.x_end), (90, 100));
    }

    #[test]
    fn empty_mask_column_uses_the_middle_third() {
        let mask = Mask::from_fn(100, 60, |x, _| x < 50);
        let roi = sample_window(&mask, 80, &ClassifierParams::default()).expect("window");
        assert_eq!((roi.y_start, roi.y_end), (20, 40));
    }

    #[test]
    fn classifies_painted_bands() {
        let img = RgbImage::from_fn(120, 40, |x, _| match x {
            20..=35 => Rgb([100, 50, 15]),
            50..=65 => Rgb([20, 20, 20]),
            80..=95 => Rgb([200, 20, 20]),
            _ => Rgb([220, 190, 140]),
        });
        let mask = Mask::full(120, 40);
        let positions = [
            BandPosition::new(28, 1.0),
            BandPosition::new(58, 1.0),
            BandPosition::new(88, 1.0),
        ];
        let colors = classify_bands(&img, &mask, &positions, &ClassifierParams::default());
        assert_eq!(
            colors,
            vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red]
        );
    }

    #[test]
    fn tolerance_bands_are_assumed_gold() {
        let positions = [BandPosition::new(5, 1.0), BandPosition::new(9, 1.0)];
        assert_eq!(
            tolerance_colors(&positions),
            vec![ColorLabel::Gold, ColorLabel::Gold]
        );
        assert!(tolerance_colors(&[]).is_empty());
    }
}
