//! Band locator: a 1-D edge-energy profile along the resistor's long axis
//! and greedy peak selection on it.

use image::{GrayImage, Luma, RgbImage};
use resistor_id_core::{Mask, Roi};
use serde::{Deserialize, Serialize};

/// Candidate band edge: image column plus smoothed profile strength.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandPosition {
    pub x: u32,
    pub strength: f32,
}

impl BandPosition {
    pub fn new(x: u32, strength: f32) -> Self {
        Self { x, strength }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    /// Fraction of the body width trimmed on each side (terminal leads).
    pub margin_x_frac: f32,
    /// Fraction of the body height trimmed on top and bottom.
    pub margin_y_frac: f32,
    /// Moving-average window over the column profile.
    pub smooth_window: usize,
    /// Minimum smoothed strength of a candidate peak (exclusive).
    pub peak_threshold: f64,
    /// Peaks closer than `roi_width / min_separation_div` are suppressed.
    pub min_separation_div: f32,
    pub max_bands: usize,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            margin_x_frac: 0.14,
            margin_y_frac: 0.15,
            smooth_window: 30,
            peak_threshold: 300.0,
            min_separation_div: 5.5,
            max_bands: 8,
        }
    }
}

impl LocatorParams {
    /// Suppression radius for an ROI of the given width.
    pub fn min_separation(&self, roi_width: u32) -> f32 {
        roi_width as f32 / self.min_separation_div.max(f32::EPSILON)
    }
}

/// Output of the locator: the analysed region and the retained positions,
/// ordered left to right.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandLocation {
    pub roi: Roi,
    pub positions: Vec<BandPosition>,
}

/// Mask bounding box minus the configured margins.
///
/// An empty mask falls back to the whole frame. `None` only for a
/// zero-sized mask.
pub fn band_roi(mask: &Mask, params: &LocatorParams) -> Option<Roi> {
    let bounds = mask
        .bounding_box()
        .or_else(|| Roi::full(mask.width(), mask.height()))?;
    Some(bounds.shrink(params.margin_x_frac, params.margin_y_frac))
}

/// Grayscale copy with every non-body pixel forced to white.
pub fn masked_gray(image: &RgbImage, mask: &Mask) -> GrayImage {
    let mut gray = image::imageops::grayscale(image);
    for (x, y, p) in gray.enumerate_pixels_mut() {
        if !mask.get(x, y) {
            *p = Luma([u8::MAX]);
        }
    }
    gray
}

#[inline]
fn reflect_101(i: i64, len: u32) -> u32 {
    let n = len as i64;
    if n == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * (n - 1) - i;
    }
    i.clamp(0, n - 1) as u32
}

/// Column sums of the absolute horizontal derivative over `roi`.
///
/// The derivative is the aperture-1 Sobel response `g(x+1) - g(x-1)` with
/// reflected borders. Entry `i` belongs to column `roi.x_start + i`.
pub fn edge_profile(gray: &GrayImage, roi: Roi) -> Vec<f64> {
    let w = gray.width();
    (roi.x_start..roi.x_end)
        .map(|x| {
            let left = reflect_101(x as i64 - 1, w);
            let right = reflect_101(x as i64 + 1, w);
            (roi.y_start..roi.y_end)
                .map(|y| {
                    let a = gray.get_pixel(left, y).0[0] as i64;
                    let b = gray.get_pixel(right, y).0[0] as i64;
                    (b - a).unsigned_abs()
                })
                .sum::<u64>() as f64
        })
        .collect()
}

/// Centred moving average with zero padding, same length as the input.
///
/// Sample `i` averages `profile[i - window/2 ..= i - window/2 + window - 1]`,
/// missing samples counting as zero.
pub fn smooth_profile(profile: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let n = profile.len() as i64;
    let half = (window / 2) as i64;
    (0..n)
        .map(|i| {
            let lo = (i - half).max(0);
            let hi = (i - half + window as i64).min(n);
            let sum: f64 = if lo < hi {
                profile[lo as usize..hi as usize].iter().sum()
            } else {
                0.0
            };
            sum / window as f64
        })
        .collect()
}

/// Strict local maxima above `threshold`, as `(index, value)`.
///
/// A flat top counts as one maximum located at its midpoint (rounded down)
/// when both neighbours of the plateau are lower. The first and last
/// samples are never peaks.
pub fn find_peaks(signal: &[f64], threshold: f64) -> Vec<(usize, f64)> {
    let n = signal.len();
    let mut peaks = Vec::new();
    let mut i = 1;
    while i + 1 < n {
        if signal[i - 1] < signal[i] {
            let mut j = i + 1;
            while j < n && signal[j] == signal[i] {
                j += 1;
            }
            if j < n && signal[j] < signal[i] {
                if signal[i] > threshold {
                    peaks.push(((i + j - 1) / 2, signal[i]));
                }
                i = j;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Greedy non-maximum suppression.
///
/// Candidates are visited strongest first (leftmost first among equals); a
/// candidate is kept only if it lies strictly farther than `min_separation`
/// from every kept one. The result is ordered left to right.
pub fn suppress_non_maxima(
    candidates: &[BandPosition],
    min_separation: f32,
) -> Vec<BandPosition> {
    let mut order: Vec<BandPosition> = candidates.to_vec();
    order.sort_by(|a, b| b.strength.total_cmp(&a.strength).then(a.x.cmp(&b.x)));

    let mut kept: Vec<BandPosition> = Vec::new();
    for c in order {
        let far = kept
            .iter()
            .all(|k| (c.x as f32 - k.x as f32).abs() > min_separation);
        if far {
            kept.push(c);
        }
    }
    kept.sort_by_key(|p| p.x);
    kept
}

/// Locate band edges on a cleaned image.
///
/// `None` only for a zero-sized image.
pub fn locate_bands(
    image: &RgbImage,
    mask: &Mask,
    params: &LocatorParams,
) -> Option<BandLocation> {
    let roi = band_roi(mask, params)?;
    let gray = masked_gray(image, mask);
    let profile = edge_profile(&gray, roi);
    let smoothed = smooth_profile(&profile, params.smooth_window);

    let candidates: Vec<BandPosition> = find_peaks(&smoothed, params.peak_threshold)
        .into_iter()
        .map(|(i, v)| BandPosition::new(roi.x_start + i as u32, v as f32))
        .collect();
    let mut positions = suppress_non_maxima(&candidates, params.min_separation(roi.width()));
    positions.truncate(params.max_bands);

    log::debug!(
        "roi {}..{} x {}..{}: {} peaks, {} kept",
        roi.x_start,
        roi.x_end,
        roi.y_start,
        roi.y_end,
        candidates.len(),
        positions.len()
    );

    Some(BandLocation { roi, positions })
}
