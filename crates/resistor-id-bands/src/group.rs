//! Split located band positions into value and tolerance groups.

use serde::{Deserialize, Serialize};

use crate::locate::BandPosition;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperParams {
    /// A gap wider than `mean_gap * (1 + gap_ratio)` isolates a tolerance band.
    pub gap_ratio: f32,
}

impl Default for GrouperParams {
    fn default() -> Self {
        Self { gap_ratio: 0.15 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandGroups {
    pub value: Vec<BandPosition>,
    pub tolerance: Vec<BandPosition>,
}

/// Partition left-to-right ordered positions.
///
/// The mean spacing excludes the trailing gap. A trailing gap above the
/// threshold moves the last position into the tolerance group; failing that,
/// a leading gap above it moves the first one. Fewer than three positions
/// are all value bands.
pub fn group_bands(positions: &[BandPosition], params: &GrouperParams) -> BandGroups {
    let all_value = || BandGroups {
        value: positions.to_vec(),
        tolerance: Vec::new(),
    };
    if positions.len() < 3 {
        return all_value();
    }

    let gaps: Vec<f32> = positions
        .windows(2)
        .map(|w| w[1].x as f32 - w[0].x as f32)
        .collect();
    let Some((&last_gap, leading)) = gaps.split_last() else {
        return all_value();
    };
    let mean_gap = leading.iter().sum::<f32>() / leading.len() as f32;
    let threshold = mean_gap * (1.0 + params.gap_ratio);

    let n = positions.len();
    if last_gap > threshold {
        BandGroups {
            value: positions[..n - 1].to_vec(),
            tolerance: positions[n - 1..].to_vec(),
        }
    } else if gaps[0] > threshold {
        BandGroups {
            value: positions[1..].to_vec(),
            tolerance: positions[..1].to_vec(),
        }
    } else {
        all_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(xs: &[u32]) -> Vec<BandPosition> {
        xs.iter().map(|&x| BandPosition::new(x, 1.0)).collect()
    }

    fn xs(v: &[BandPosition]) -> Vec<u32> {
        v.iter().map(|p| p.x).collect()
    }

    #[test]
    fn trailing_wide_gap_is_the_tolerance_band() {
        let g = group_bands(&at(&[10, 20, 30, 80]), &GrouperParams::default());
        assert_eq!(xs(&g.value), vec![10, 20, 30]);
        assert_eq!(xs(&g.tolerance), vec![80]);
    }

    #[test]
    fn leading_wide_gap_is_the_tolerance_band() {
        let g = group_bands(&at(&[10, 60, 70, 80]), &GrouperParams::default());
        assert_eq!(xs(&g.value), vec![60, 70, 80]);
        assert_eq!(xs(&g.tolerance), vec![10]);
    }

    #[test]
    fn trailing_gap_wins_over_leading_gap() {
        // Leading gap 40, then 10 and a trailing gap of 60: mean 25.
        let g = group_bands(&at(&[0, 40, 50, 110]), &GrouperParams::default());
        assert_eq!(xs(&g.tolerance), vec![110]);
        assert_eq!(xs(&g.value), vec![0, 40, 50]);
    }

    #[test]
    fn even_spacing_keeps_everything_as_value_bands() {
        let g = group_bands(&at(&[10, 20, 30, 40]), &GrouperParams::default());
        assert_eq!(xs(&g.value), vec![10, 20, 30, 40]);
        assert!(g.tolerance.is_empty());
    }

    #[test]
    fn short_lists_never_have_a_tolerance_band() {
        for list in [&[][..], &[5][..], &[5, 500][..]] {
            let g = group_bands(&at(list), &GrouperParams::default());
            assert!(g.tolerance.is_empty());
            assert_eq!(xs(&g.value), list.to_vec());
        }
    }

    #[test]
    fn gap_exactly_at_threshold_does_not_split() {
        // mean 20, threshold 20 * 1.5 = 30.
        let params = GrouperParams { gap_ratio: 0.5 };
        let g = group_bands(&at(&[0, 20, 50]), &params);
        assert!(g.tolerance.is_empty());
    }
}
