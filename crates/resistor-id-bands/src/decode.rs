//! Color sequence to resistance value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorLabel;

/// Why a color sequence could not be turned into a value.
///
/// Serialized with its [`DecodeError::name`] under `kind`, e.g.
/// `{"kind": "InsufficientBands", "found": 2}`.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DecodeError {
    #[error("need at least 3 value bands, found {found}")]
    InsufficientBands { found: usize },
    #[error("band {position} is {color}, which carries no digit")]
    InvalidDigitColor { position: usize, color: ColorLabel },
    #[error("band 3 is {color}, which carries no multiplier")]
    InvalidMultiplierColor { color: ColorLabel },
}

impl DecodeError {
    /// Stable short name of the failure kind.
    pub fn name(&self) -> &'static str {
        match self {
            DecodeError::InsufficientBands { .. } => "InsufficientBands",
            DecodeError::InvalidDigitColor { .. } => "InvalidDigitColor",
            DecodeError::InvalidMultiplierColor { .. } => "InvalidMultiplierColor",
        }
    }
}

/// Decoded resistance.
///
/// Exactly one of `ohms` and `error` is set, so "no value" is never
/// confused with zero ohms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodedValue {
    pub ohms: Option<f64>,
    pub formatted: String,
    pub tolerance_percent: Option<f64>,
    pub error: Option<DecodeError>,
}

/// Placeholder text for a value that could not be decoded.
pub const NOT_DECODED: &str = "N/A";

impl DecodedValue {
    fn failed(error: DecodeError) -> Self {
        Self {
            ohms: None,
            formatted: NOT_DECODED.to_string(),
            tolerance_percent: None,
            error: Some(error),
        }
    }

    #[inline]
    pub fn is_decoded(&self) -> bool {
        self.ohms.is_some()
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, self.tolerance_percent) {
            (Some(err), _) => write!(f, "{} ({err})", err.name()),
            (None, Some(tol)) => write!(f, "{} ±{tol}%", self.formatted),
            (None, None) => f.write_str(&self.formatted),
        }
    }
}

/// Format with a metric prefix and one decimal: `MΩ` from 1 000 000,
/// `kΩ` from 1 000, plain `Ω` below.
pub fn format_ohms(ohms: f64) -> String {
    if ohms >= 1_000_000.0 {
        format!("{:.1}MΩ", ohms / 1_000_000.0)
    } else if ohms >= 1_000.0 {
        format!("{:.1}kΩ", ohms / 1_000.0)
    } else {
        format!("{ohms:.1}Ω")
    }
}

fn digit_at(colors: &[ColorLabel], position: usize) -> Result<u8, DecodeError> {
    let color = colors[position];
    color.digit().ok_or(DecodeError::InvalidDigitColor {
        position: position + 1,
        color,
    })
}

fn decode_value(value: &[ColorLabel]) -> Result<f64, DecodeError> {
    if value.len() < 3 {
        return Err(DecodeError::InsufficientBands { found: value.len() });
    }
    let first = digit_at(value, 0)?;
    let second = digit_at(value, 1)?;
    let multiplier = value[2]
        .multiplier()
        .ok_or(DecodeError::InvalidMultiplierColor { color: value[2] })?;
    Ok(f64::from(first * 10 + second) * multiplier)
}

/// Decode the first three value colors (digit, digit, multiplier); extra
/// value colors are ignored. The first tolerance color sets the tolerance
/// when it has a tolerance meaning.
pub fn decode_resistance(value: &[ColorLabel], tolerance: &[ColorLabel]) -> DecodedValue {
    match decode_value(value) {
        Ok(ohms) => DecodedValue {
            ohms: Some(ohms),
            formatted: format_ohms(ohms),
            tolerance_percent: tolerance.first().and_then(|c| c.tolerance_percent()),
            error: None,
        },
        Err(err) => DecodedValue::failed(err),
    }
}
