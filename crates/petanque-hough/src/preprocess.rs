use image::imageops::grayscale;
use image::{GrayImage, ImageBuffer, Rgb};
use imageproc::filter::separable_filter_equal;
use petanque_core::RgbImageView;

use crate::PreprocessParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Luma of the working frame, as `image` computes it for `to_luma8`.
pub fn to_gray(frame: &RgbImageView<'_>) -> GrayImage {
    let (w, h) = (frame.width as u32, frame.height as u32);
    match ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(w, h, frame.data) {
        Some(rgb) => grayscale(&rgb),
        None => GrayImage::new(w, h),
    }
}

/// Normalized 1-D Gaussian kernel.
///
/// Even sizes are bumped to the next odd size. A non-positive `sigma` is
/// derived from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let size = if size % 2 == 0 { size + 1 } else { size };
    let sigma = if sigma > 0.0 && sigma.is_finite() {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut k: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = k.iter().sum();
    for v in &mut k {
        *v /= sum;
    }
    k
}

/// Gaussian blur with the kernel from `params`, run as two 1-D passes.
/// Borders replicate the edge pixel.
pub fn gaussian_blur(img: &GrayImage, params: &PreprocessParams) -> GrayImage {
    if img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    let kernel = gaussian_kernel(params.kernel_size.max(1), params.sigma);
    separable_filter_equal(img, &kernel)
}

/// Grayscale conversion followed by the fixed smoothing blur.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(width = frame.width, height = frame.height))
)]
pub fn preprocess(frame: &RgbImageView<'_>, params: &PreprocessParams) -> GrayImage {
    let gray = to_gray(frame);
    gaussian_blur(&gray, params)
}
