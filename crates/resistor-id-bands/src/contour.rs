//! Contour and connected-component helpers on top of `imageproc`.

use image::Luma;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length, min_area_rect};
use imageproc::point::Point;
use imageproc::region_labelling::{connected_components, Connectivity};
use nalgebra::Point2;
use resistor_id_core::Mask;

/// Outer border of a top-level foreground region.
#[derive(Clone, Debug)]
pub struct Silhouette {
    pub points: Vec<Point<i32>>,
    pub area: f64,
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice as f64).abs() / 2.0
}

/// Outermost contours of the mask foreground (holes and nested islands are
/// skipped).
pub fn external_contours(mask: &Mask) -> Vec<Silhouette> {
    find_contours::<i32>(&mask.to_gray())
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Silhouette {
            area: polygon_area(&c.points),
            points: c.points,
        })
        .collect()
}

/// External contour enclosing the largest area; the first one wins ties.
pub fn largest_external_contour(mask: &Mask) -> Option<Silhouette> {
    external_contours(mask)
        .into_iter()
        .reduce(|best, c| if c.area > best.area { c } else { best })
}

/// Four corners of the silhouette.
///
/// A Douglas-Peucker approximation with tolerance `epsilon_frac * perimeter`
/// is used when it yields exactly four vertices; otherwise the corners of the
/// minimum-area bounding rectangle are returned.
pub fn silhouette_quad(
    points: &[Point<i32>],
    epsilon_frac: f64,
) -> ([Point2<f32>; 4], QuadSource) {
    let to_f32 = |p: &Point<i32>| Point2::new(p.x as f32, p.y as f32);

    if points.len() >= 4 {
        let epsilon = epsilon_frac * arc_length(points, true);
        if epsilon > 0.0 {
            let mut approx = approximate_polygon_dp(points, epsilon, true);
            if approx.len() > 1 && approx.first() == approx.last() {
                approx.pop();
            }
            if let [a, b, c, d] = approx.as_slice() {
                return ([a, b, c, d].map(to_f32), QuadSource::Polygon);
            }
        }
    }

    let rect = min_area_rect(points);
    (
        [&rect[0], &rect[1], &rect[2], &rect[3]].map(to_f32),
        QuadSource::MinAreaRect,
    )
}

/// How the four rectification corners were obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadSource {
    Polygon,
    MinAreaRect,
}

/// Keep only the largest 8-connected foreground component, with its
/// interior holes filled. `None` when the mask has no foreground.
pub fn largest_component_filled(mask: &Mask) -> Option<Mask> {
    let labels = connected_components(&mask.to_gray(), Connectivity::Eight, Luma([0u8]));

    let mut areas: Vec<usize> = Vec::new();
    for p in labels.pixels() {
        let l = p.0[0] as usize;
        if l == 0 {
            continue;
        }
        if areas.len() <= l {
            areas.resize(l + 1, 0);
        }
        areas[l] += 1;
    }
    let (best, _) = areas
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, &a)| a > 0)
        .fold(None, |acc: Option<(usize, usize)>, (l, &a)| match acc {
            Some((_, best_a)) if best_a >= a => acc,
            _ => Some((l, a)),
        })?;

    let component = Mask::from_fn(mask.width(), mask.height(), |x, y| {
        labels.get_pixel(x, y).0[0] as usize == best
    });
    Some(fill_holes(&component))
}

/// Set every background pixel that is not 4-connected to the image border.
pub fn fill_holes(mask: &Mask) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    if w == 0 || h == 0 {
        return mask.clone();
    }
    let background =
        connected_components(&mask.invert().to_gray(), Connectivity::Four, Luma([0u8]));

    let mut outside = vec![false; 1];
    let mut mark = |x: u32, y: u32| {
        let l = background.get_pixel(x, y).0[0] as usize;
        if l != 0 {
            if outside.len() <= l {
                outside.resize(l + 1, false);
            }
            outside[l] = true;
        }
    };
    for x in 0..w {
        mark(x, 0);
        mark(x, h - 1);
    }
    for y in 0..h {
        mark(0, y);
        mark(w - 1, y);
    }

    Mask::from_fn(w, h, |x, y| {
        let l = background.get_pixel(x, y).0[0] as usize;
        l == 0 || !outside.get(l).copied().unwrap_or(false)
    })
}
