/// Borrowed interleaved RGB frame (`len = width * height * 3`, row-major).
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned interleaved RGB frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Frame filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl RgbImageView<'_> {
    /// Pixel at integer coordinates; callers guarantee bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

#[inline]
fn get_rgb(src: &RgbImageView<'_>, x: i32, y: i32) -> Option<[f32; 3]> {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return None;
    }
    let [r, g, b] = src.pixel(x as usize, y as usize);
    Some([r as f32, g as f32, b as f32])
}

/// Bilinear RGB sample with integer coordinates at pixel centers.
///
/// Returns `None` when the sample point lies outside the frame; taps that
/// fall off the last row/column are clamped to the border.
#[inline]
pub fn sample_bilinear_rgb(src: &RgbImageView<'_>, x: f32, y: f32) -> Option<[u8; 3]> {
    if !x.is_finite() || !y.is_finite() || src.width == 0 || src.height == 0 {
        return None;
    }
    if x < -0.5 || y < -0.5 || x > src.width as f32 - 0.5 || y > src.height as f32 - 0.5 {
        return None;
    }
    let xc = x.clamp(0.0, (src.width - 1) as f32);
    let yc = y.clamp(0.0, (src.height - 1) as f32);
    let x0 = xc.floor() as i32;
    let y0 = yc.floor() as i32;
    let fx = xc - x0 as f32;
    let fy = yc - y0 as f32;

    let p00 = get_rgb(src, x0, y0)?;
    let p10 = get_rgb(src, x0 + 1, y0).unwrap_or(p00);
    let p01 = get_rgb(src, x0, y0 + 1).unwrap_or(p00);
    let p11 = get_rgb(src, x0 + 1, y0 + 1).unwrap_or(p01);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame() -> RgbImage {
        let (w, h) = (4usize, 3usize);
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[(x * 10) as u8, (y * 20) as u8, 7]);
            }
        }
        RgbImage {
            width: w,
            height: h,
            data,
        }
    }

    #[test]
    fn integer_coordinates_hit_pixels_exactly() {
        let img = gradient_frame();
        let view = img.view();
        assert_eq!(sample_bilinear_rgb(&view, 2.0, 1.0), Some([20, 20, 7]));
        assert_eq!(sample_bilinear_rgb(&view, 3.0, 2.0), Some([30, 40, 7]));
    }

    #[test]
    fn half_pixel_interpolates() {
        let img = gradient_frame();
        let view = img.view();
        assert_eq!(sample_bilinear_rgb(&view, 1.5, 0.5), Some([15, 10, 7]));
    }

    #[test]
    fn outside_frame_is_none() {
        let img = gradient_frame();
        let view = img.view();
        assert_eq!(sample_bilinear_rgb(&view, -3.0, 1.0), None);
        assert_eq!(sample_bilinear_rgb(&view, 1.0, 9.0), None);
        assert_eq!(sample_bilinear_rgb(&view, f32::NAN, 1.0), None);
    }
}
