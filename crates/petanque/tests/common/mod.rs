#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

pub const GRAVEL: [u8; 3] = [25, 35, 25];
pub const JACK_YELLOW: [u8; 3] = [240, 220, 60];
pub const BALL_STEEL: [u8; 3] = [200, 200, 210];

/// Flat court with filled discs `(cx, cy, r, rgb)` painted in order.
pub fn court(w: u32, h: u32, discs: &[(f32, f32, f32, [u8; 3])]) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        let mut px = GRAVEL;
        for &(cx, cy, r, rgb) in discs {
            if (x as f32 - cx).hypot(y as f32 - cy) <= r {
                px = rgb;
            }
        }
        Rgb(px)
    })
}

/// The reference scene: jack r=10 at (100, 100), ball r=40 at (300, 300).
pub fn jack_and_ball() -> RgbImage {
    court(
        720,
        540,
        &[
            (100.0, 100.0, 10.0, JACK_YELLOW),
            (300.0, 300.0, 40.0, BALL_STEEL),
        ],
    )
}

pub fn black(w: u32, h: u32) -> RgbImage {
    RgbImage::new(w, h)
}

pub fn save(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("save test image");
    path
}
