//! HSV color summaries.
//!
//! Values follow the 8-bit OpenCV convention: hue in `[0, 180)`, saturation
//! and value in `[0, 255]`. Hue is kept continuous (no rounding) so region
//! means are not quantized.

use serde::{Deserialize, Serialize};

use crate::RgbImageView;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

/// Convert one RGB pixel to HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = max - min;

    let saturation = if max > 0.0 { diff * 255.0 / max } else { 0.0 };

    let hue_deg = if diff <= 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / diff
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    let hue_deg = if hue_deg < 0.0 { hue_deg + 360.0 } else { hue_deg };

    Hsv {
        hue: hue_deg * 0.5,
        saturation,
        value: max,
    }
}

/// Mean HSV over an axis-aligned rectangle, clipped to the frame.
///
/// The rectangle is `[x0, x0 + w) x [y0, y0 + h)` in pixel indices. Returns
/// `None` when nothing of it lies inside the frame.
pub fn mean_hsv_in_rect(img: &RgbImageView<'_>, x0: i64, y0: i64, w: i64, h: i64) -> Option<Hsv> {
    let xa = x0.max(0);
    let ya = y0.max(0);
    let xb = (x0 + w).min(img.width as i64);
    let yb = (y0 + h).min(img.height as i64);
    if xa >= xb || ya >= yb {
        return None;
    }

    let mut sum_h = 0.0f64;
    let mut sum_s = 0.0f64;
    let mut sum_v = 0.0f64;
    for y in ya as usize..yb as usize {
        for x in xa as usize..xb as usize {
            let [r, g, b] = img.pixel(x, y);
            let hsv = rgb_to_hsv(r, g, b);
            sum_h += hsv.hue as f64;
            sum_s += hsv.saturation as f64;
            sum_v += hsv.value as f64;
        }
    }
    let n = ((xb - xa) * (yb - ya)) as f64;
    Some(Hsv {
        hue: (sum_h / n) as f32,
        saturation: (sum_s / n) as f32,
        value: (sum_v / n) as f32,
    })
}
