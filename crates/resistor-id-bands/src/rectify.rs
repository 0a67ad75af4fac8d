//! Perspective rectification of a tilted photograph into a top-down view.

use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;
use nalgebra::Point2;
use resistor_id_core::{
    close, homography_from_4pt, open, warp_perspective_rgb, Hsv, HsvImage, HsvRange, RectKernel,
};
use serde::{Deserialize, Serialize};

use crate::contour::{largest_external_contour, silhouette_quad, QuadSource};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while rectifying a photograph.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RectifyError {
    #[error("no backdrop contour survived cleanup")]
    NoContourFound,
    #[error("detected corners do not span a quadrilateral")]
    DegenerateQuad,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Gaussian sigma for sensor-noise suppression; `0` disables the blur.
    pub blur_sigma: f32,
    /// Hue range of the capture rig backdrop.
    pub background: HsvRange,
    pub open_kernel: RectKernel,
    pub close_kernel: RectKernel,
    /// Tall, thin closing that bridges gaps along the vertical extent.
    pub vertical_close_kernel: RectKernel,
    /// Polygon approximation tolerance as a fraction of the perimeter.
    pub approx_epsilon_frac: f64,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            background: HsvRange::new(Hsv::new(90, 50, 40), Hsv::new(130, 255, 255)),
            open_kernel: RectKernel::square(5),
            close_kernel: RectKernel::square(5),
            vertical_close_kernel: RectKernel::new(3, 25),
            approx_epsilon_frac: 0.02,
        }
    }
}

/// Rectified view together with the geometry that produced it.
#[derive(Clone, Debug)]
pub struct Rectified {
    pub image: RgbImage,
    /// Source corners ordered TL, TR, BR, BL.
    pub corners: [Point2<f32>; 4],
    pub quad_source: QuadSource,
}

/// Order four points as top-left, top-right, bottom-right, bottom-left.
///
/// TL minimises `x + y`, BR maximises it; TR minimises `y - x`, BL
/// maximises it. The result does not depend on the input order.
pub fn order_corners(pts: &[Point2<f32>; 4]) -> [Point2<f32>; 4] {
    let pick = |key: fn(&Point2<f32>) -> f32, want_max: bool| -> Point2<f32> {
        let mut best = pts[0];
        for p in &pts[1..] {
            let better = if want_max {
                key(p) > key(&best)
            } else {
                key(p) < key(&best)
            };
            if better {
                best = *p;
            }
        }
        best
    };
    let sum = |p: &Point2<f32>| p.x + p.y;
    let diff = |p: &Point2<f32>| p.y - p.x;

    [
        pick(sum, false),
        pick(diff, false),
        pick(sum, true),
        pick(diff, true),
    ]
}

/// Output size for ordered corners: the longer of each pair of opposite
/// edges, floored, at least one pixel.
pub fn rectified_size(corners: &[Point2<f32>; 4]) -> (u32, u32) {
    let [tl, tr, br, bl] = corners;
    let dist = |a: &Point2<f32>, b: &Point2<f32>| (a - b).norm();
    let width = dist(tl, tr).max(dist(bl, br));
    let height = dist(tl, bl).max(dist(tr, br));
    let floor = |v: f32| (v.floor() as u32).max(1);
    (floor(width), floor(height))
}

/// Warp the quadrilateral `corners` (TL, TR, BR, BL, pixel indices) of
/// `image` onto a `width x height` canvas.
pub fn warp_quad(
    image: &RgbImage,
    corners: &[Point2<f32>; 4],
    width: u32,
    height: u32,
) -> Result<RgbImage, RectifyError> {
    // Corner pixels map onto the outermost output pixels.
    let (w, h) = (width.saturating_sub(1) as f32, height.saturating_sub(1) as f32);
    let dst = [
        Point2::new(0.0, 0.0),
        Point2::new(w, 0.0),
        Point2::new(w, h),
        Point2::new(0.0, h),
    ];
    let h_src_from_dst =
        homography_from_4pt(&dst, corners).ok_or(RectifyError::DegenerateQuad)?;
    Ok(warp_perspective_rgb(image, &h_src_from_dst, width, height))
}

/// Find the backdrop silhouette in `image` and warp it top-down.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(image, params),
        fields(width = image.width(), height = image.height())
    )
)]
pub fn rectify(image: &RgbImage, params: &RectifyParams) -> Result<Rectified, RectifyError> {
    let smoothed = if params.blur_sigma > 0.0 {
        gaussian_blur_f32(image, params.blur_sigma)
    } else {
        image.clone()
    };

    let mask = HsvImage::from_rgb(&smoothed).in_range(&params.background);
    let mask = open(&mask, params.open_kernel);
    let mask = close(&mask, params.close_kernel);
    let mask = close(&mask, params.vertical_close_kernel);

    let silhouette = largest_external_contour(&mask).ok_or(RectifyError::NoContourFound)?;
    let (quad, quad_source) = silhouette_quad(&silhouette.points, params.approx_epsilon_frac);
    let corners = order_corners(&quad);
    let (width, height) = rectified_size(&corners);

    log::debug!(
        "silhouette area {:.0} px, corners from {:?}, rectified to {}x{}",
        silhouette.area,
        quad_source,
        width,
        height
    );

    let image = warp_quad(image, &corners, width, height)?;
    Ok(Rectified {
        image,
        corners,
        quad_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;

    const BACKDROP: Rgb<u8> = Rgb([30, 60, 200]);
    const TABLE: Rgb<u8> = Rgb([120, 120, 120]);
    const BODY: Rgb<u8> = Rgb([220, 190, 140]);

    fn square() -> [Point2<f32>; 4] {
        [
            Point2::new(10.0, 10.0),
            Point2::new(90.0, 12.0),
            Point2::new(88.0, 70.0),
            Point2::new(12.0, 68.0),
        ]
    }

    #[test]
    fn ordering_is_permutation_invariant() {
        let q = square();
        let expected = order_corners(&q);
        let perms = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2], [2, 3, 0, 1]];
        for perm in perms {
            let shuffled = perm.map(|i| q[i]);
            let ordered = order_corners(&shuffled);
            assert_eq!(ordered, expected, "perm {perm:?}");
            let sums: Vec<f32> = shuffled.iter().map(|p| p.x + p.y).collect();
            let min = sums.iter().cloned().fold(f32::INFINITY, f32::min);
            let max = sums.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            assert_eq!(ordered[0].x + ordered[0].y, min);
            assert_eq!(ordered[2].x + ordered[2].y, max);
        }
        assert_eq!(expected, q);
    }

    #[test]
    fn size_takes_longer_opposite_edges() {
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(90.0, 40.5),
            Point2::new(0.0, 40.0),
        ];
        let (w, h) = rectified_size(&corners);
        assert_eq!(w, 100);
        assert_eq!(h, 41);
    }

    #[test]
    fn size_is_never_zero() {
        let p = Point2::new(3.0, 3.0);
        assert_eq!(rectified_size(&[p, p, p, p]), (1, 1));
    }

    #[test]
    fn axis_aligned_rectangle_keeps_its_aspect_ratio() {
        let mut img = RgbImage::from_pixel(200, 120, TABLE);
        for y in 20..80 {
            for x in 30..170 {
                img.put_pixel(x, y, BACKDROP);
            }
        }
        let out = rectify(&img, &RectifyParams::default()).expect("rectified");
        let (w, h) = out.image.dimensions();
        let aspect = w as f32 / h as f32;
        let expected = 139.0 / 59.0;
        assert!(
            (aspect - expected).abs() < 0.1,
            "aspect {aspect} vs {expected} ({w}x{h})"
        );
        let center = out.image.get_pixel(w / 2, h / 2);
        assert!(center[2] > 150 && center[0] < 80, "center {center:?}");
    }

    #[test]
    fn tilted_backdrop_is_warped_top_down() {
        let mut img = RgbImage::from_pixel(320, 240, TABLE);
        let quad = [
            Point::new(60, 40),
            Point::new(270, 60),
            Point::new(250, 200),
            Point::new(40, 180),
        ];
        draw_polygon_mut(&mut img, &quad, BACKDROP);
        // Resistor body lying in the middle of the backdrop.
        let body = [
            Point::new(120, 105),
            Point::new(200, 112),
            Point::new(197, 140),
            Point::new(117, 133),
        ];
        draw_polygon_mut(&mut img, &body, BODY);

        let out = rectify(&img, &RectifyParams::default()).expect("rectified");
        let (w, h) = out.image.dimensions();
        assert!((200..=225).contains(&w), "width {w}");
        assert!((135..=150).contains(&h), "height {h}");

        // Corners of the output are backdrop, the middle is the body.
        let corner = out.image.get_pixel(3, 3);
        assert!(corner[2] > 150, "corner {corner:?}");
        let middle = out.image.get_pixel(w / 2, h / 2);
        assert!(middle[0] > 180 && middle[2] < 180, "middle {middle:?}");
    }

    #[test]
    fn frame_without_backdrop_reports_no_contour() {
        let img = RgbImage::from_pixel(64, 48, TABLE);
        let err = rectify(&img, &RectifyParams::default()).unwrap_err();
        assert_eq!(err, RectifyError::NoContourFound);
    }
}
