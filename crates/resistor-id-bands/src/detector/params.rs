use serde::{Deserialize, Serialize};

use crate::classify::ClassifierParams;
use crate::group::GrouperParams;
use crate::locate::LocatorParams;
use crate::rectify::RectifyParams;
use crate::segment::SegmentParams;

/// Configuration for the band detector, one group per pipeline stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandDetectorParams {
    /// Rectify the raw photograph before segmentation. Disable for inputs
    /// that are already top-down crops of the body.
    pub rectify: bool,
    pub rectifier: RectifyParams,
    pub segment: SegmentParams,
    pub locator: LocatorParams,
    pub grouper: GrouperParams,
    pub classifier: ClassifierParams,
}

impl Default for BandDetectorParams {
    fn default() -> Self {
        Self {
            rectify: true,
            rectifier: RectifyParams::default(),
            segment: SegmentParams::default(),
            locator: LocatorParams::default(),
            grouper: GrouperParams::default(),
            classifier: ClassifierParams::default(),
        }
    }
}

impl BandDetectorParams {
    /// Defaults for images that are already rectified.
    pub fn without_rectification() -> Self {
        Self {
            rectify: false,
            ..Self::default()
        }
    }
}
