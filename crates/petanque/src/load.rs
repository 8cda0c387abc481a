use std::path::Path;

use image::imageops::{self, FilterType};
use image::ImageReader;
use log::{debug, info};
use petanque_core::RgbImageView;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{apply_sidecar, AnalysisError, CalibrationStatus, LoaderParams};

/// Working frame plus how it was derived from the file.
#[derive(Clone, Debug)]
pub struct LoadedFrame {
    pub frame: image::RgbImage,
    pub source_size: FrameSize,
    /// Working size divided by source size (1.0 when untouched).
    pub scale: f32,
    pub calibration: CalibrationStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn of(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    pub fn longer_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Borrow an `image` buffer as a core RGB view.
pub fn frame_view(img: &image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

pub fn decode_image(path: &Path) -> Result<image::RgbImage, AnalysisError> {
    let decode_err = |source| AnalysisError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    Ok(img.to_rgb8())
}

/// Target size for `size` under `params`, or `None` when no resize is needed.
///
/// Scaling is isotropic and applied to the longer side; dimensions are
/// rounded and never drop below one pixel.
pub fn working_size(size: FrameSize, params: &LoaderParams) -> Option<(FrameSize, f32)> {
    let long = size.longer_side();
    if long == 0 {
        return None;
    }
    let target = if long < params.min_resolution {
        params.min_resolution
    } else {
        match params.max_resolution {
            Some(max) if max > 0 && long > max => max,
            _ => return None,
        }
    };

    let scale = target as f32 / long as f32;
    let dim = |v: u32| ((v as f32 * scale).round() as u32).max(1);
    Some((
        FrameSize {
            width: dim(size.width),
            height: dim(size.height),
        },
        scale,
    ))
}

/// Resize `img` into the working resolution: bilinear when growing,
/// area averaging when shrinking.
pub fn fit_resolution(img: image::RgbImage, params: &LoaderParams) -> (image::RgbImage, f32) {
    let size = FrameSize::of(&img);
    let Some((target, scale)) = working_size(size, params) else {
        return (img, 1.0);
    };
    debug!(
        "resizing {}x{} -> {}x{} (scale {:.3})",
        size.width, size.height, target.width, target.height, scale
    );
    let resized = if scale > 1.0 {
        imageops::resize(&img, target.width, target.height, FilterType::Triangle)
    } else {
        imageops::thumbnail(&img, target.width, target.height)
    };
    (resized, scale)
}

/// Decode, resize and (optionally) calibrate the input.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all, fields(path = %path.display())))]
pub fn load_frame(path: &Path, params: &LoaderParams) -> Result<LoadedFrame, AnalysisError> {
    let decoded = decode_image(path)?;
    let source_size = FrameSize::of(&decoded);
    let (frame, scale) = fit_resolution(decoded, params);

    let (frame, calibration) = if params.use_calibration {
        apply_sidecar(frame, path)
    } else {
        (frame, CalibrationStatus::NotFound)
    };

    info!(
        "loaded {} ({}x{} -> {}x{})",
        path.display(),
        source_size.width,
        source_size.height,
        frame.width(),
        frame.height()
    );
    Ok(LoadedFrame {
        frame,
        source_size,
        scale,
        calibration,
    })
}
