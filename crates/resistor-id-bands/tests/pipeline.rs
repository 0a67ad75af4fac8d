use image::{Rgb, RgbImage};
use resistor_id_bands::{
    BandDetectError, BandDetector, BandDetectorParams, ColorLabel, SegmentParams,
    SegmentationQuality,
};

const BACKDROP: Rgb<u8> = Rgb([30, 60, 200]);
const TABLE: Rgb<u8> = Rgb([120, 120, 120]);
const BODY: Rgb<u8> = Rgb([220, 190, 140]);
const BROWN: Rgb<u8> = Rgb([100, 50, 15]);
const BLACK: Rgb<u8> = Rgb([20, 20, 20]);
const RED: Rgb<u8> = Rgb([200, 20, 20]);
const GOLD_PAINT: Rgb<u8> = Rgb([140, 110, 40]);

/// Paint a 320x80 resistor body with its left edge at `x0` and top at `y0`:
/// brown, black, red value bands and a detached gold tolerance band.
fn paint_resistor(img: &mut RgbImage, x0: u32, y0: u32) {
    let bands = [(70, BROWN), (120, BLACK), (170, RED), (240, GOLD_PAINT)];
    for y in y0..y0 + 80 {
        for x in x0..x0 + 320 {
            let dx = x - x0;
            let color = bands
                .iter()
                .find(|(c, _)| (c - 8..c + 8).contains(&dx))
                .map(|(_, color)| *color)
                .unwrap_or(BODY);
            img.put_pixel(x, y, color);
        }
    }
}

fn top_down_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(400, 120, BACKDROP);
    paint_resistor(&mut img, 40, 20);
    img
}

fn photo_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(480, 240, TABLE);
    for y in 20..220 {
        for x in 20..460 {
            img.put_pixel(x, y, BACKDROP);
        }
    }
    paint_resistor(&mut img, 60, 80);
    img
}

fn xs(positions: &[resistor_id_bands::BandPosition]) -> Vec<u32> {
    positions.iter().map(|p| p.x).collect()
}

#[test]
fn decodes_a_top_down_resistor() {
    let detector = BandDetector::new(BandDetectorParams::without_rectification());
    let det = detector
        .detect(&top_down_scene(), "R1000_top.png")
        .expect("detection");
    let a = &det.analysis;

    assert_eq!(a.filename, "R1000_top.png");
    assert_eq!(a.segmentation, SegmentationQuality::Isolated);
    assert_eq!(
        (a.roi.x_start, a.roi.x_end, a.roi.y_start, a.roi.y_end),
        (84, 316, 32, 88)
    );
    assert_eq!(a.band_count, 4);
    assert_eq!(xs(&a.value_positions), vec![110, 160, 210]);
    assert_eq!(xs(&a.tolerance_positions), vec![280]);
    assert_eq!(
        a.value_colors,
        vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red]
    );
    assert_eq!(a.tolerance_colors, vec![ColorLabel::Gold]);
    assert_eq!(a.decoded.ohms, Some(1000.0));
    assert_eq!(a.decoded.formatted, "1.0kΩ");
    assert_eq!(a.decoded.tolerance_percent, Some(5.0));
    assert!(a.rectified_size.is_none());
    assert!(det.rectified.is_none());

    // Backdrop flattened to white, body untouched.
    assert_eq!(det.cleaned.get_pixel(5, 5), &Rgb([255, 255, 255]));
    assert_eq!(det.cleaned.get_pixel(60, 60), &BODY);
}

#[test]
fn decodes_after_rectifying_a_photograph() {
    let det = BandDetector::default()
        .detect(&photo_scene(), "R1000_photo.jpg")
        .expect("detection");
    let a = &det.analysis;

    let (w, h) = a.rectified_size.expect("rectified");
    assert!((438..=443).contains(&w), "width {w}");
    assert!((198..=203).contains(&h), "height {h}");
    assert!(det.rectified.is_some());
    assert_eq!(det.cleaned.dimensions(), (w, h));

    assert_eq!(a.value_band_count, 3);
    assert_eq!(a.tolerance_band_count, 1);
    assert_eq!(
        a.value_colors,
        vec![ColorLabel::Brown, ColorLabel::Black, ColorLabel::Red]
    );
    assert_eq!(a.decoded.formatted, "1.0kΩ");
    assert_eq!(a.decoded.to_string(), "1.0kΩ ±5%");
}

#[test]
fn photograph_without_backdrop_has_no_contour() {
    let img = RgbImage::from_pixel(160, 90, TABLE);
    let err = BandDetector::default().detect(&img, "x").unwrap_err();
    assert_eq!(err, BandDetectError::NoContourFound);
}

#[test]
fn empty_image_is_rejected() {
    let err = BandDetector::default()
        .detect(&RgbImage::new(0, 0), "empty")
        .unwrap_err();
    assert_eq!(err, BandDetectError::EmptyImage);
}

#[test]
fn degraded_segmentation_is_reported_not_hidden() {
    let img = RgbImage::from_pixel(200, 60, BACKDROP);

    let lenient = BandDetector::new(BandDetectorParams::without_rectification());
    let det = lenient.detect(&img, "blank").expect("detection");
    assert_eq!(det.analysis.segmentation, SegmentationQuality::Degraded);
    assert_eq!(det.mask.count(), 200 * 60);
    assert_eq!(det.analysis.band_count, 0);
    let err = det.analysis.decoded.error.expect("decode error");
    assert_eq!(err.name(), "InsufficientBands");

    let strict = BandDetector::new(BandDetectorParams {
        segment: SegmentParams {
            reject_degraded: true,
            ..SegmentParams::default()
        },
        ..BandDetectorParams::without_rectification()
    });
    assert_eq!(
        strict.detect(&img, "blank").unwrap_err(),
        BandDetectError::DegradedSegmentation
    );
}

#[test]
fn analysis_serializes_for_reports() {
    let det = BandDetector::new(BandDetectorParams::without_rectification())
        .detect(&top_down_scene(), "R1000_top.png")
        .expect("detection");
    let json = serde_json::to_value(&det.analysis).expect("json");
    assert_eq!(json["value_colors"][0], "brown");
    assert_eq!(json["tolerance_colors"][0], "gold");
    assert_eq!(json["segmentation"], "isolated");
    assert_eq!(json["decoded"]["ohms"], 1000.0);
}
