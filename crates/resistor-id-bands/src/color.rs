//! Band color palette: digit, multiplier and tolerance coding (IEC 60062)
//! plus the calibrated HSV ranges used to recognise each color.

use std::fmt;
use std::str::FromStr;

use resistor_id_core::{Hsv, HsvRange};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Gray,
    White,
    Gold,
    Silver,
    Unknown,
}

/// Color assigned to every tolerance band.
///
/// The tolerance band is never classified: gold is by far the most common
/// tolerance ring, so it is assumed. Silver (10 %) resistors therefore
/// decode with a 5 % tolerance.
pub const ASSUMED_TOLERANCE_COLOR: ColorLabel = ColorLabel::Gold;

const fn range(lo: (u8, u8, u8), hi: (u8, u8, u8)) -> HsvRange {
    HsvRange::new(Hsv::new(lo.0, lo.1, lo.2), Hsv::new(hi.0, hi.1, hi.2))
}

const BLACK: [HsvRange; 1] = [range((0, 0, 0), (179, 255, 45))];
const BROWN: [HsvRange; 1] = [range((0, 100, 46), (20, 255, 110))];
// Red straddles hue 0, so it needs both ends of the circle.
const RED: [HsvRange; 2] = [
    range((0, 100, 111), (8, 255, 255)),
    range((170, 100, 111), (179, 255, 255)),
];
const ORANGE: [HsvRange; 1] = [range((9, 120, 111), (19, 255, 255))];
const YELLOW: [HsvRange; 1] = [range((20, 100, 120), (34, 255, 255))];
const GREEN: [HsvRange; 1] = [range((35, 60, 46), (85, 255, 255))];
const BLUE: [HsvRange; 1] = [range((86, 60, 46), (125, 255, 255))];
const VIOLET: [HsvRange; 1] = [range((126, 40, 46), (160, 255, 255))];
const GRAY: [HsvRange; 1] = [range((0, 0, 46), (179, 40, 149))];
const WHITE: [HsvRange; 1] = [range((0, 0, 196), (179, 30, 255))];
const GOLD: [HsvRange; 1] = [range((12, 50, 80), (30, 99, 200))];
const SILVER: [HsvRange; 1] = [range((0, 0, 150), (179, 30, 195))];

impl ColorLabel {
    /// Classifiable colors in declaration order; earlier entries win ties.
    pub const PALETTE: [ColorLabel; 12] = [
        ColorLabel::Black,
        ColorLabel::Brown,
        ColorLabel::Red,
        ColorLabel::Orange,
        ColorLabel::Yellow,
        ColorLabel::Green,
        ColorLabel::Blue,
        ColorLabel::Violet,
        ColorLabel::Gray,
        ColorLabel::White,
        ColorLabel::Gold,
        ColorLabel::Silver,
    ];

    /// Significant-figure value, `None` for gold, silver and unknown.
    pub fn digit(self) -> Option<u8> {
        match self {
            ColorLabel::Black => Some(0),
            ColorLabel::Brown => Some(1),
            ColorLabel::Red => Some(2),
            ColorLabel::Orange => Some(3),
            ColorLabel::Yellow => Some(4),
            ColorLabel::Green => Some(5),
            ColorLabel::Blue => Some(6),
            ColorLabel::Violet => Some(7),
            ColorLabel::Gray => Some(8),
            ColorLabel::White => Some(9),
            ColorLabel::Gold | ColorLabel::Silver | ColorLabel::Unknown => None,
        }
    }

    pub fn multiplier(self) -> Option<f64> {
        match self {
            ColorLabel::Gold => Some(0.1),
            ColorLabel::Silver => Some(0.01),
            other => other.digit().map(|d| 10f64.powi(d as i32)),
        }
    }

    pub fn tolerance_percent(self) -> Option<f64> {
        match self {
            ColorLabel::Brown => Some(1.0),
            ColorLabel::Red => Some(2.0),
            ColorLabel::Green => Some(0.5),
            ColorLabel::Blue => Some(0.25),
            ColorLabel::Violet => Some(0.1),
            ColorLabel::Gold => Some(5.0),
            ColorLabel::Silver => Some(10.0),
            _ => None,
        }
    }

    /// Calibrated HSV ranges; a pixel matches the color if it falls in any.
    pub fn hsv_ranges(self) -> &'static [HsvRange] {
        match self {
            ColorLabel::Black => &BLACK,
            ColorLabel::Brown => &BROWN,
            ColorLabel::Red => &RED,
            ColorLabel::Orange => &ORANGE,
            ColorLabel::Yellow => &YELLOW,
            ColorLabel::Green => &GREEN,
            ColorLabel::Blue => &BLUE,
            ColorLabel::Violet => &VIOLET,
            ColorLabel::Gray => &GRAY,
            ColorLabel::White => &WHITE,
            ColorLabel::Gold => &GOLD,
            ColorLabel::Silver => &SILVER,
            ColorLabel::Unknown => &[],
        }
    }

    #[inline]
    pub fn matches(self, p: Hsv) -> bool {
        self.hsv_ranges().iter().any(|r| r.contains(p))
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorLabel::Black => "black",
            ColorLabel::Brown => "brown",
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Blue => "blue",
            ColorLabel::Violet => "violet",
            ColorLabel::Gray => "gray",
            ColorLabel::White => "white",
            ColorLabel::Gold => "gold",
            ColorLabel::Silver => "silver",
            ColorLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised color name {0:?}")]
pub struct ParseColorError(pub String);

impl FromStr for ColorLabel {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let label = match lower.as_str() {
            "grey" => ColorLabel::Gray,
            "purple" => ColorLabel::Violet,
            "unknown" => ColorLabel::Unknown,
            name => ColorLabel::PALETTE
                .into_iter()
                .find(|c| c.name() == name)
                .ok_or_else(|| ParseColorError(s.to_string()))?,
        };
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_follow_palette_order() {
        let digits: Vec<u8> = ColorLabel::PALETTE
            .iter()
            .filter_map(|c| c.digit())
            .collect();
        assert_eq!(digits, (0..10).collect::<Vec<u8>>());
    }

    #[test]
    fn metallic_colors_carry_only_multiplier_and_tolerance() {
        for c in [ColorLabel::Gold, ColorLabel::Silver] {
            assert!(c.digit().is_none());
            assert!(c.multiplier().is_some());
            assert!(c.tolerance_percent().is_some());
        }
        assert_eq!(ColorLabel::Gold.multiplier(), Some(0.1));
        assert_eq!(ColorLabel::Silver.tolerance_percent(), Some(10.0));
    }

    #[test]
    fn some_digit_colors_have_no_tolerance_meaning() {
        for c in [
            ColorLabel::Black,
            ColorLabel::Orange,
            ColorLabel::Yellow,
            ColorLabel::White,
            ColorLabel::Gray,
        ] {
            assert!(c.tolerance_percent().is_none(), "{c}");
        }
    }

    #[test]
    fn unknown_has_no_coding_and_no_ranges() {
        let u = ColorLabel::Unknown;
        assert!(u.digit().is_none());
        assert!(u.multiplier().is_none());
        assert!(u.tolerance_percent().is_none());
        assert!(u.hsv_ranges().is_empty());
    }

    #[test]
    fn red_matches_both_ends_of_the_hue_circle() {
        assert!(ColorLabel::Red.matches(Hsv::new(3, 200, 200)));
        assert!(ColorLabel::Red.matches(Hsv::new(175, 200, 200)));
        assert!(!ColorLabel::Red.matches(Hsv::new(90, 200, 200)));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Brown".parse::<ColorLabel>(), Ok(ColorLabel::Brown));
        assert_eq!(" GREY ".parse::<ColorLabel>(), Ok(ColorLabel::Gray));
        assert_eq!("purple".parse::<ColorLabel>(), Ok(ColorLabel::Violet));
        assert!("teal".parse::<ColorLabel>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_names() {
        let json = serde_json::to_string(&ColorLabel::Violet).expect("serialize");
        assert_eq!(json, "\"violet\"");
    }
}
