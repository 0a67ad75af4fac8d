//! Resistor color-band decoding.
//!
//! Pipeline, leaf first:
//! - [`rectify`] finds the backdrop silhouette and warps it top-down,
//! - [`segment_body`] separates the resistor body from the backdrop,
//! - [`locate_bands`] finds band edges on a column edge-energy profile,
//! - [`group_bands`] splits them into value and tolerance bands,
//! - [`classify_bands`] assigns a palette color per value band,
//! - [`decode_resistance`] turns the colors into ohms and a tolerance.
//!
//! [`BandDetector`] runs all of them on one image.

mod classify;
mod color;
mod contour;
mod decode;
mod detector;
mod group;
mod io;
mod locate;
mod rectify;
mod segment;

pub use classify::{
    classify_bands, classify_region, sample_window, tolerance_colors, ClassifierParams,
};
pub use color::{ColorLabel, ParseColorError, ASSUMED_TOLERANCE_COLOR};
pub use contour::{
    external_contours, fill_holes, largest_component_filled, largest_external_contour,
    polygon_area, silhouette_quad, QuadSource, Silhouette,
};
pub use decode::{decode_resistance, format_ohms, DecodeError, DecodedValue, NOT_DECODED};
pub use detector::{
    BandDetectError, BandDetection, BandDetector, BandDetectorParams, ResistorAnalysis,
};
pub use group::{group_bands, BandGroups, GrouperParams};
pub use io::{
    BandDetectConfig, BandDetectReport, BandIoError, ReportEntry, ReportSummary,
    DEFAULT_REPORT_PATH,
};
pub use locate::{
    band_roi, edge_profile, find_peaks, locate_bands, masked_gray, smooth_profile,
    suppress_non_maxima, BandLocation, BandPosition, LocatorParams,
};
pub use rectify::{
    order_corners, rectified_size, rectify, warp_quad, Rectified, RectifyError, RectifyParams,
};
pub use segment::{
    flatten_background, segment_body, SegmentParams, Segmentation, SegmentationQuality,
    SegmentedBody, FLATTENED_BACKGROUND,
};

pub use resistor_id_core::{Hsv, HsvRange, Mask, RectKernel, Roi};
