//! JSON configuration and report helpers for band detection.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    BandDetector, BandDetectorParams, ClassifierParams, GrouperParams, LocatorParams,
    RectifyParams, ResistorAnalysis, SegmentParams,
};

#[derive(thiserror::Error, Debug)]
pub enum BandIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Default file name of the batch report.
pub const DEFAULT_REPORT_PATH: &str = "resistor_report.json";

/// JSON configuration: every parameter group is optional and overrides the
/// calibrated defaults when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandDetectConfig {
    #[serde(default)]
    pub rectify: Option<bool>,
    #[serde(default)]
    pub rectifier: Option<RectifyParams>,
    #[serde(default)]
    pub segment: Option<SegmentParams>,
    #[serde(default)]
    pub locator: Option<LocatorParams>,
    #[serde(default)]
    pub grouper: Option<GrouperParams>,
    #[serde(default)]
    pub classifier: Option<ClassifierParams>,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl BandDetectConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BandIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BandIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
    }

    /// Build detector parameters, applying overrides from the config.
    pub fn build_params(&self) -> BandDetectorParams {
        let mut params = BandDetectorParams::default();
        if let Some(rectify) = self.rectify {
            params.rectify = rectify;
        }
        if let Some(rectifier) = self.rectifier.clone() {
            params.rectifier = rectifier;
        }
        if let Some(segment) = self.segment.clone() {
            params.segment = segment;
        }
        if let Some(locator) = self.locator.clone() {
            params.locator = locator;
        }
        if let Some(grouper) = self.grouper.clone() {
            params.grouper = grouper;
        }
        if let Some(classifier) = self.classifier.clone() {
            params.classifier = classifier;
        }
        params
    }

    /// Build a detector from this config.
    pub fn build_detector(&self) -> BandDetector {
        BandDetector::new(self.build_params())
    }
}

/// One processed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub file: String,
    #[serde(default)]
    pub analysis: Option<ResistorAnalysis>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReportEntry {
    pub fn success(file: impl Into<String>, analysis: ResistorAnalysis) -> Self {
        Self {
            file: file.into(),
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failure(file: impl Into<String>, err: impl fmt::Display) -> Self {
        Self {
            file: file.into(),
            analysis: None,
            error: Some(err.to_string()),
        }
    }

    /// True when the analysis produced a resistance value.
    pub fn is_decoded(&self) -> bool {
        self.analysis
            .as_ref()
            .is_some_and(|a| a.decoded.is_decoded())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub processed: usize,
    /// Files that yielded a resistance value.
    pub decoded: usize,
    /// Files whose pipeline failed before decoding.
    pub failed: usize,
}

/// Batch report, entries ordered by file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandDetectReport {
    pub entries: Vec<ReportEntry>,
    pub summary: ReportSummary,
}

impl BandDetectReport {
    /// Build a report; entries are sorted by file and the summary recomputed.
    pub fn new(mut entries: Vec<ReportEntry>) -> Self {
        entries.sort_by(|a, b| a.file.cmp(&b.file));
        let summary = ReportSummary {
            processed: entries.len(),
            decoded: entries.iter().filter(|e| e.is_decoded()).count(),
            failed: entries.iter().filter(|e| e.error.is_some()).count(),
        };
        Self { entries, summary }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BandIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BandIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
