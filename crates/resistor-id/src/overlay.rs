//! Diagnostic rendering of an analysis on top of the cleaned image.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use resistor_id_bands::{BandPosition, ResistorAnalysis};

pub const VALUE_BAND_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
pub const TOLERANCE_BAND_COLOR: Rgb<u8> = Rgb([212, 175, 55]);
pub const ROI_COLOR: Rgb<u8> = Rgb([220, 0, 0]);

fn draw_positions(canvas: &mut RgbImage, positions: &[BandPosition], color: Rgb<u8>) {
    let bottom = canvas.height().saturating_sub(1) as f32;
    for p in positions {
        let x = p.x as f32;
        draw_line_segment_mut(canvas, (x, 0.0), (x, bottom), color);
    }
}

/// Copy of `cleaned` with the analysed region outlined and a vertical line
/// through every value band (green) and tolerance band (gold).
pub fn render_overlay(cleaned: &RgbImage, analysis: &ResistorAnalysis) -> RgbImage {
    let mut canvas = cleaned.clone();
    let roi = analysis.roi;
    let rect = Rect::at(roi.x_start as i32, roi.y_start as i32).of_size(roi.width(), roi.height());
    draw_hollow_rect_mut(&mut canvas, rect, ROI_COLOR);
    draw_positions(&mut canvas, &analysis.value_positions, VALUE_BAND_COLOR);
    draw_positions(&mut canvas, &analysis.tolerance_positions, TOLERANCE_BAND_COLOR);
    canvas
}
