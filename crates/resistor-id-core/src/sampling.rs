use image::{Rgb, RgbImage};

#[inline]
fn get_rgb(src: &RgbImage, x: i32, y: i32) -> [f32; 3] {
    // Replicate the border; callers never sample empty images.
    let xc = x.clamp(0, src.width() as i32 - 1) as u32;
    let yc = y.clamp(0, src.height() as i32 - 1) as u32;
    let p = src.get_pixel(xc, yc).0;
    [p[0] as f32, p[1] as f32, p[2] as f32]
}

/// Bilinear sample of an RGB image at a sub-pixel location.
///
/// Coordinates outside the image are clamped to the nearest edge pixel.
/// `src` must be non-empty.
#[inline]
pub fn sample_bilinear_rgb(src: &RgbImage, x: f32, y: f32) -> [f32; 3] {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_rgb(src, x0, y0);
    let p10 = get_rgb(src, x0 + 1, y0);
    let p01 = get_rgb(src, x0, y0 + 1);
    let p11 = get_rgb(src, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = a + fy * (b - a);
    }
    out
}

#[inline]
pub fn sample_bilinear_rgb_u8(src: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let v = sample_bilinear_rgb(src, x, y);
    Rgb(v.map(|c| c.round().clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp() -> RgbImage {
        RgbImage::from_fn(4, 3, |x, y| Rgb([(x * 10) as u8, (y * 20) as u8, 7]))
    }

    #[test]
    fn integer_locations_return_pixels() {
        let img = ramp();
        assert_eq!(sample_bilinear_rgb_u8(&img, 2.0, 1.0), Rgb([20, 20, 7]));
    }

    #[test]
    fn interpolates_between_neighbours() {
        let img = ramp();
        let v = sample_bilinear_rgb(&img, 1.5, 0.5);
        assert_abs_diff_eq!(v[0], 15.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v[1], 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v[2], 7.0, epsilon = 1e-4);
    }

    #[test]
    fn clamps_outside_the_image() {
        let img = ramp();
        assert_eq!(sample_bilinear_rgb_u8(&img, -5.0, -5.0), Rgb([0, 0, 7]));
        assert_eq!(sample_bilinear_rgb_u8(&img, 50.0, 50.0), Rgb([30, 40, 7]));
    }
}
