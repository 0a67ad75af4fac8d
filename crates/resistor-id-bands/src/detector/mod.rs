//! Band decoding pipeline.
//!
//! This module wires together rectification, background segmentation, band
//! location and grouping, color classification and value decoding.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::BandDetectError;
pub use params::BandDetectorParams;
pub use pipeline::BandDetector;
pub use result::{BandDetection, ResistorAnalysis};
