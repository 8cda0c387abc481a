//! Overlay rendering: jack and ball outlines, jack-to-ball lines, distance
//! labels and rank numbers.

use std::path::Path;

use image::Rgb;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use petanque_classify::Ranking;
use petanque_core::Circle;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{AnalysisError, AnnotateParams};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const LABEL_GAP: i32 = 4;

/// 5x7 glyphs, one row per byte, most significant of the low five bits is
/// the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        'p' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        'x' => [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        _ => [0; 7],
    }
}

/// Width and height in pixels of `text` at `scale`.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    let advance = (GLYPH_W + 1) * scale;
    (n * advance - scale, GLYPH_H * scale)
}

/// Draw `text` with its bottom-left corner at `(x, y)`, clipped to the canvas.
pub fn draw_text(canvas: &mut image::RgbImage, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1);
    let top = y - (GLYPH_H * scale) as i32;
    let mut left = x;
    for c in text.chars() {
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    let px = left + (col * scale) as i32;
                    let py = top + (row as u32 * scale) as i32;
                    draw_filled_rect_mut(canvas, Rect::at(px, py).of_size(scale, scale), color);
                }
            }
        }
        left += ((GLYPH_W + 1) * scale) as i32;
    }
}

/// Circle outline `thickness` pixels wide, centered on the nominal radius.
fn draw_ring(canvas: &mut image::RgbImage, circle: &Circle, thickness: u32, color: Rgb<u8>) {
    let center = (circle.x.round() as i32, circle.y.round() as i32);
    let r = circle.r.round() as i32;
    let t = thickness.max(1) as i32;
    let inner = r - (t - 1) / 2;
    for radius in inner..inner + t {
        if radius > 0 {
            draw_hollow_circle_mut(canvas, center, radius, color);
        }
    }
}

pub fn distance_label(distance_px: f32) -> String {
    format!("d={}px", distance_px.round() as i64)
}

/// Render the ranking onto the working frame.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all, fields(balls = ranking.balls.len())))]
pub fn annotate(mut frame: image::RgbImage, ranking: &Ranking, params: &AnnotateParams) -> image::RgbImage {
    let jack = ranking.jack.circle;
    draw_ring(&mut frame, &jack, params.jack_thickness, Rgb(params.jack_color));

    for (rank, ranked) in ranking.balls.iter().enumerate() {
        let ball = ranked.ball.circle;
        draw_ring(&mut frame, &ball, params.ball_thickness, Rgb(params.ball_color));
        draw_line_segment_mut(&mut frame, (jack.x, jack.y), (ball.x, ball.y), Rgb(params.line_color));

        // centered horizontally on the midpoint, just above it
        let label = distance_label(ranked.distance_px);
        let (label_w, _) = text_size(&label, params.label_scale.max(1));
        let mid_x = ((jack.x + ball.x) / 2.0).round() as i32;
        let mid_y = ((jack.y + ball.y) / 2.0).round() as i32;
        draw_text(
            &mut frame,
            mid_x - (label_w / 2) as i32,
            mid_y - LABEL_GAP,
            &label,
            params.label_scale,
            Rgb(params.label_color),
        );

        if params.rank_numbers {
            let offset = (ball.r * 0.7).round() as i32;
            draw_text(
                &mut frame,
                ball.x.round() as i32 + offset,
                ball.y.round() as i32 - offset,
                &(rank + 1).to_string(),
                params.label_scale,
                Rgb(params.label_color),
            );
        }
    }
    frame
}

/// Encode the annotated frame; the format follows the file extension.
pub fn save_annotated(frame: &image::RgbImage, path: &Path) -> Result<(), AnalysisError> {
    frame.save(path).map_err(|source| AnalysisError::WriteImage {
        path: path.to_path_buf(),
        source,
    })
}
