use image::RgbImage;
use resistor_id_core::{Mask, Roi};
use serde::{Deserialize, Serialize};

use crate::color::ColorLabel;
use crate::decode::DecodedValue;
use crate::locate::BandPosition;
use crate::rectify::Rectified;
use crate::segment::SegmentationQuality;

/// Per-image analysis: band counts, positions, colors and decoded value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResistorAnalysis {
    pub filename: String,
    /// Positions retained by the locator, before grouping.
    pub band_count: usize,
    pub value_band_count: usize,
    pub tolerance_band_count: usize,
    pub value_colors: Vec<ColorLabel>,
    pub tolerance_colors: Vec<ColorLabel>,
    pub value_positions: Vec<BandPosition>,
    pub tolerance_positions: Vec<BandPosition>,
    pub decoded: DecodedValue,
    pub segmentation: SegmentationQuality,
    /// Analysed region in the coordinates of the (rectified) working image.
    pub roi: Roi,
    #[serde(default)]
    pub rectified_size: Option<(u32, u32)>,
}

/// Output of a detection run: the analysis plus the intermediate images a
/// caller may want to cache or render.
#[derive(Clone, Debug)]
pub struct BandDetection {
    pub analysis: ResistorAnalysis,
    /// Present when rectification ran.
    pub rectified: Option<Rectified>,
    /// Working image with the background flattened to white.
    pub cleaned: RgbImage,
    pub mask: Mask,
}
