use image::RgbImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{BandDetectError, BandDetection, BandDetectorParams, ResistorAnalysis};
use crate::classify::{classify_bands, tolerance_colors};
use crate::decode::decode_resistance;
use crate::group::group_bands;
use crate::locate::locate_bands;
use crate::rectify::{rectify, Rectified};
use crate::segment::segment_body;

/// Linear band decoding pipeline.
///
/// Each call runs rectification (optional), segmentation, location,
/// grouping, classification and decoding on fresh buffers; the detector
/// itself only holds parameters and is safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct BandDetector {
    params: BandDetectorParams,
}

impl BandDetector {
    pub fn new(params: BandDetectorParams) -> Self {
        Self { params }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &BandDetectorParams {
        &self.params
    }

    /// Decode the resistor in `image`. `name` is recorded as the analysis
    /// filename.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width(), height = image.height())
        )
    )]
    pub fn detect(&self, image: &RgbImage, name: &str) -> Result<BandDetection, BandDetectError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BandDetectError::EmptyImage);
        }

        if !self.params.rectify {
            return self.analyze(image, name, None);
        }

        let rectified = rectify(image, &self.params.rectifier)?;
        let mut detection = self.analyze(&rectified.image, name, Some(&rectified))?;
        detection.rectified = Some(rectified);
        Ok(detection)
    }

    /// Stages after rectification, run on the working image.
    fn analyze(
        &self,
        image: &RgbImage,
        name: &str,
        rectified: Option<&Rectified>,
    ) -> Result<BandDetection, BandDetectError> {
        let params = &self.params;

        let segmentation = segment_body(image, &params.segment);
        let quality = segmentation.quality();
        if segmentation.is_degraded() && params.segment.reject_degraded {
            return Err(BandDetectError::DegradedSegmentation);
        }
        let body = segmentation.into_body();

        let location = locate_bands(&body.image, &body.mask, &params.locator)
            .ok_or(BandDetectError::EmptyImage)?;
        let groups = group_bands(&location.positions, &params.grouper);

        let value_colors =
            classify_bands(&body.image, &body.mask, &groups.value, &params.classifier);
        let tolerance_colors = tolerance_colors(&groups.tolerance);
        let decoded = decode_resistance(&value_colors, &tolerance_colors);

        log::debug!(
            "{name}: {} bands ({} value, {} tolerance), colors {:?} + {:?} -> {}",
            location.positions.len(),
            groups.value.len(),
            groups.tolerance.len(),
            value_colors,
            tolerance_colors,
            decoded
        );

        let analysis = ResistorAnalysis {
            filename: name.to_string(),
            band_count: location.positions.len(),
            value_band_count: groups.value.len(),
            tolerance_band_count: groups.tolerance.len(),
            value_colors,
            tolerance_colors,
            value_positions: groups.value,
            tolerance_positions: groups.tolerance,
            decoded,
            segmentation: quality,
            roi: location.roi,
            rectified_size: rectified.map(|r| r.image.dimensions()),
        };

        Ok(BandDetection {
            analysis,
            rectified: None,
            cleaned: body.image,
            mask: body.mask,
        })
    }
}
