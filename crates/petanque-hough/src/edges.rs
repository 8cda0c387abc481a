//! Canny-style edge extraction that keeps the gradient of every edge pixel.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// One edge pixel with its Sobel gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePoint {
    pub x: u32,
    pub y: u32,
    pub gx: f32,
    pub gy: f32,
}

/// Thin edge map in raster order.
#[derive(Clone, Debug, Default)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    pub points: Vec<EdgePoint>,
}

impl EdgeMap {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

const NONE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;
const EDGE: u8 = 3;

/// Sobel gradients, L1 magnitude, non-maximum suppression along the
/// quantized gradient direction and hysteresis (`high`, `high / 2`).
pub fn detect_edges(gray: &GrayImage, high: f32) -> EdgeMap {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let mut map = EdgeMap {
        width: w,
        height: h,
        points: Vec::new(),
    };
    if w < 3 || h < 3 {
        return map;
    }

    let gx_img = horizontal_sobel(gray);
    let gy_img = vertical_sobel(gray);
    let gx = gx_img.as_raw();
    let gy = gy_img.as_raw();

    let mag: Vec<f32> = gx
        .iter()
        .zip(gy.iter())
        .map(|(&a, &b)| (a as f32).abs() + (b as f32).abs())
        .collect();

    let low = high * 0.5;
    let mut state = vec![NONE; w * h];
    let mut stack = Vec::new();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let m = mag[i];
            if m <= low {
                continue;
            }
            let ax = (gx[i] as f32).abs();
            let ay = (gy[i] as f32).abs();

            // (before, after) neighbor offsets along the gradient
            let (n1, n2) = if ay <= ax * TAN_22_5 {
                (i - 1, i + 1)
            } else if ay >= ax * TAN_67_5 {
                (i - w, i + w)
            } else if (gx[i] > 0) == (gy[i] > 0) {
                (i - w - 1, i + w + 1)
            } else {
                (i - w + 1, i + w - 1)
            };

            if m > mag[n1] && m >= mag[n2] {
                if m > high {
                    state[i] = STRONG;
                    stack.push(i);
                } else {
                    state[i] = WEAK;
                }
            }
        }
    }

    while let Some(i) = stack.pop() {
        if state[i] == EDGE {
            continue;
        }
        state[i] = EDGE;
        let (x, y) = (i % w, i / w);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if state[j] == WEAK || state[j] == STRONG {
                    stack.push(j);
                }
            }
        }
    }

    for (i, &s) in state.iter().enumerate() {
        if s == EDGE {
            map.points.push(EdgePoint {
                x: (i % w) as u32,
                y: (i / w) as u32,
                gx: gx[i] as f32,
                gy: gy[i] as f32,
            });
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn uniform_frame_has_no_edges() {
        let img = GrayImage::from_pixel(40, 30, Luma([128]));
        assert!(detect_edges(&img, 120.0).is_empty());
    }

    #[test]
    fn tiny_frame_has_no_edges() {
        let img = GrayImage::from_pixel(2, 2, Luma([255]));
        assert!(detect_edges(&img, 120.0).is_empty());
    }

    #[test]
    fn vertical_step_yields_one_thin_column() {
        let img = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([20]) } else { Luma([220]) });
        let edges = detect_edges(&img, 120.0);
        assert!(!edges.is_empty());
        for p in &edges.points {
            assert!(p.x == 9 || p.x == 10, "unexpected edge column {}", p.x);
            assert!(p.gx > 0.0);
            assert_eq!(p.gy, 0.0);
        }
        // one pixel per interior row
        assert_eq!(edges.len(), 8);
    }

    #[test]
    fn weak_step_is_rejected() {
        let img = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([100]) } else { Luma([110]) });
        assert!(detect_edges(&img, 120.0).is_empty());
    }
}
