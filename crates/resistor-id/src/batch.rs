//! Batch discovery and a bounded parallel driver.
//!
//! Input photographs are named `R<id>_<variant>.<ext>`. Files are processed
//! independently on a rayon pool; a failing file is recorded and the rest of
//! the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use rayon::prelude::*;
use resistor_id_bands::{BandDetectReport, BandDetector, ReportEntry, ResistorAnalysis};
use serde::{Deserialize, Serialize};

use crate::detect::{
    detect_file, display_name, overlay_path, rectified_cache_path, save_image, DetectError,
};
use crate::overlay::render_overlay;

#[cfg(feature = "tracing")]
use tracing::instrument;

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Parts of a conforming input file name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputName {
    /// Decimal digits after the leading `R`.
    pub id: String,
    pub variant: String,
}

/// Parse `R<digits>_<variant>.<jpg|jpeg|png>`; the extension is matched
/// case-insensitively and the variant may contain ASCII alphanumerics, `-`
/// and `_`.
pub fn parse_input_name(file_name: &str) -> Option<InputName> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        return None;
    }
    let rest = stem.strip_prefix('R')?;
    let (id, variant) = rest.split_once('_')?;
    let id_ok = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
    let variant_ok = !variant.is_empty()
        && variant
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    (id_ok && variant_ok).then(|| InputName {
        id: id.to_string(),
        variant: variant.to_string(),
    })
}

/// Conforming regular files directly under `dir`, sorted by path.
pub fn discover_inputs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DetectError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().and_then(parse_input_name).is_some() {
            files.push(entry.path());
        }
    }
    files.sort();
    log::debug!("discovered {} input files", files.len());
    Ok(files)
}

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Worker threads; `0` uses the rayon default.
    pub jobs: usize,
    /// Write each rectified view as `<dir>/<stem>_rectified.png`.
    pub rectified_dir: Option<PathBuf>,
    /// Write a diagnostic overlay as `<dir>/<stem>_overlay.png`.
    pub overlay_dir: Option<PathBuf>,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<ResistorAnalysis, DetectError>,
}

impl BatchEntry {
    pub fn to_report_entry(&self) -> ReportEntry {
        let file = display_name(&self.path);
        match &self.result {
            Ok(analysis) => ReportEntry::success(file, analysis.clone()),
            Err(err) => ReportEntry::failure(file, err),
        }
    }
}

fn save_diagnostic(out: PathBuf, img: &RgbImage) {
    if let Err(err) = save_image(&out, img) {
        log::warn!("{}: not written: {err}", out.display());
    }
}

/// Detect, then write the optional rectified view and overlay.
///
/// Only detection decides the result: a rectified view or overlay that
/// cannot be written is logged and skipped.
pub fn process_file(
    detector: &BandDetector,
    path: &Path,
    opts: &BatchOptions,
) -> Result<ResistorAnalysis, DetectError> {
    let detection = detect_file(detector, path)?;

    if let (Some(dir), Some(rectified)) = (&opts.rectified_dir, &detection.rectified) {
        save_diagnostic(rectified_cache_path(dir, path), &rectified.image);
    }
    if let Some(dir) = &opts.overlay_dir {
        let overlay = render_overlay(&detection.cleaned, &detection.analysis);
        save_diagnostic(overlay_path(dir, path), &overlay);
    }
    Ok(detection.analysis)
}

/// Process `files` in parallel; entries come back sorted by path.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(files = files.len()))
)]
pub fn process_batch(
    files: &[PathBuf],
    detector: &BandDetector,
    opts: &BatchOptions,
) -> Result<Vec<BatchEntry>, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs)
        .build()?;

    let mut entries: Vec<BatchEntry> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = process_file(detector, path, opts);
                if let Err(err) = &result {
                    log::warn!("{}: {err}", path.display());
                }
                BatchEntry {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    });
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// Aggregate batch entries into a report.
pub fn build_report(entries: &[BatchEntry]) -> BandDetectReport {
    BandDetectReport::new(entries.iter().map(BatchEntry::to_report_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conforming_names() {
        assert_eq!(
            parse_input_name("R220_front.jpg"),
            Some(InputName {
                id: "220".to_string(),
                variant: "front".to_string()
            })
        );
        let n = parse_input_name("R4700_side-2_b.JPEG").expect("name");
        assert_eq!(n.id, "4700");
        assert_eq!(n.variant, "side-2_b");
        assert!(parse_input_name("R1_a.png").is_some());
    }

    #[test]
    fn rejects_non_conforming_names() {
        for name in [
            "r220_front.jpg",
            "R_front.jpg",
            "R22a_front.jpg",
            "R220.jpg",
            "R220_.jpg",
            "R220_front.gif",
            "R220_front",
            "R220_fr ont.jpg",
            "notes.txt",
        ] {
            assert!(parse_input_name(name).is_none(), "{name}");
        }
    }

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["R20_b.png", "R10_a.jpg", "readme.md", "R30_c.gif", "R15_x.JPG"] {
            fs::write(dir.path().join(name), b"x").expect("write");
        }
        fs::create_dir(dir.path().join("R99_dir.png")).expect("mkdir");

        let found: Vec<String> = discover_inputs(dir.path())
            .expect("discover")
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(found, vec!["R10_a.jpg", "R15_x.JPG", "R20_b.png"]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        assert!(matches!(
            discover_inputs("/definitely/not/a/dir"),
            Err(DetectError::Io(_))
        ));
    }
}
