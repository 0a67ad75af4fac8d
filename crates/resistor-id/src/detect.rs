//! Image file boundary: load, save and run the detector on files.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader, RgbImage};
use resistor_id_bands::{BandDetectError, BandDetection, BandDetector};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the file-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoadFailed { path: PathBuf, source: ImageError },

    #[error("failed to save image {}: {source}", path.display())]
    ImageSaveFailed { path: PathBuf, source: ImageError },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Detect(#[from] BandDetectError),
}

/// Decode an image file (JPEG, PNG, ...) into 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, DetectError> {
    let path = path.as_ref();
    let load_failed = |source: ImageError| DetectError::ImageLoadFailed {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| load_failed(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_failed(ImageError::IoError(e)))?
        .decode()
        .map_err(load_failed)?;
    Ok(img.to_rgb8())
}

/// Save `img`, creating missing parent directories first.
pub fn save_image(path: impl AsRef<Path>, img: &RgbImage) -> Result<(), DetectError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    img.save(path).map_err(|source| DetectError::ImageSaveFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn derived_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{stem}_{suffix}.png"))
}

/// `<dir>/<stem>_rectified.png`.
pub fn rectified_cache_path(dir: impl AsRef<Path>, input: impl AsRef<Path>) -> PathBuf {
    derived_path(dir.as_ref(), input.as_ref(), "rectified")
}

/// `<dir>/<stem>_overlay.png`.
pub fn overlay_path(dir: impl AsRef<Path>, input: impl AsRef<Path>) -> PathBuf {
    derived_path(dir.as_ref(), input.as_ref(), "overlay")
}

/// File name used as the analysis name.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Load `path` and run `detector` on it.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(detector)))]
pub fn detect_file(
    detector: &BandDetector,
    path: &Path,
) -> Result<BandDetection, DetectError> {
    let img = load_rgb(path)?;
    Ok(detector.detect(&img, &display_name(path))?)
}
