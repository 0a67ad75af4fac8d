//! High-level facade for the `resistor-id-*` workspace.
//!
//! This crate provides:
//! - re-exports of the primitive (`core`) and pipeline (`bands`) crates,
//! - image file load/save helpers and `detect_file`,
//! - batch discovery plus a bounded parallel batch driver,
//! - a diagnostic overlay renderer,
//! - the `resistor-id` command line tool (feature `cli`).
//!
//! ## Quickstart
//!
//! ```no_run
//! use resistor_id::{detect_file, BandDetector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = BandDetector::default();
//! let detection = detect_file(&detector, "R1000_front.jpg".as_ref())?;
//! println!("{}", detection.analysis.decoded);
//! # Ok(())
//! # }
//! ```

pub use resistor_id_bands as bands;
pub use resistor_id_core as core;

pub use resistor_id_bands::{
    decode_resistance, format_ohms, BandDetectConfig, BandDetectError, BandDetectReport,
    BandDetection, BandDetector, BandDetectorParams, ColorLabel, DecodeError, DecodedValue,
    ResistorAnalysis, ASSUMED_TOLERANCE_COLOR,
};

pub mod batch;
pub mod detect;
pub mod overlay;

pub use batch::{
    build_report, discover_inputs, parse_input_name, process_batch, process_file, BatchEntry,
    BatchError, BatchOptions, InputName,
};
pub use detect::{
    detect_file, load_rgb, overlay_path, rectified_cache_path, save_image, DetectError,
};
pub use overlay::render_overlay;

/// Install logging for command line use.
///
/// With the `tracing` feature a `tracing` subscriber (optionally JSON) is
/// installed with `level` as its default filter; otherwise the plain stderr
/// logger is used and `json` is ignored.
pub fn init_logging(level: log::LevelFilter, json: bool) {
    #[cfg(feature = "tracing")]
    {
        use tracing_log::AsTrace;
        resistor_id_core::init_tracing(json, level.as_trace());
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = json;
        let _ = resistor_id_core::init_with_level(level);
    }
}
