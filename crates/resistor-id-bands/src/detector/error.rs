use crate::rectify::RectifyError;

/// Errors returned by the band detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BandDetectError {
    #[error("input image is empty")]
    EmptyImage,
    #[error("no backdrop contour survived cleanup")]
    NoContourFound,
    #[error("detected corners do not span a quadrilateral")]
    DegenerateQuad,
    #[error("body segmentation degraded to the whole frame")]
    DegradedSegmentation,
}

impl From<RectifyError> for BandDetectError {
    fn from(err: RectifyError) -> Self {
        match err {
            RectifyError::NoContourFound => BandDetectError::NoContourFound,
            RectifyError::DegenerateQuad => BandDetectError::DegenerateQuad,
        }
    }
}
