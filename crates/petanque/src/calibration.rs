//! Optional four-point planar correction read from a sidecar file.
//!
//! The sidecar is `calibration.json` in the input's directory:
//! `{ "src": [[x, y] x 4], "dst": [[x, y] x 4] }`. The working frame is
//! warped through the src→dst homography with black fill. Any problem with
//! the sidecar leaves the frame untouched and is reported as
//! [`CalibrationStatus::Ignored`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use nalgebra::Point2;
use petanque_core::{homography_from_4pt, warp_perspective_rgb, Homography};
use serde::{Deserialize, Serialize};

use crate::{frame_view, CalibrationError};

pub const CALIBRATION_FILE: &str = "calibration.json";

/// Four source points and the four points they map to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSpec {
    pub src: Vec<[f32; 2]>,
    pub dst: Vec<[f32; 2]>,
}

impl CalibrationSpec {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibrationError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn corners(&self) -> Result<([Point2<f32>; 4], [Point2<f32>; 4]), CalibrationError> {
        let as_quad = |pts: &[[f32; 2]]| -> Option<[Point2<f32>; 4]> {
            match pts {
                [a, b, c, d] => Some([a, b, c, d].map(|p| Point2::new(p[0], p[1]))),
                _ => None,
            }
        };
        match (as_quad(&self.src), as_quad(&self.dst)) {
            (Some(src), Some(dst)) => Ok((src, dst)),
            _ => Err(CalibrationError::PointCount {
                src: self.src.len(),
                dst: self.dst.len(),
            }),
        }
    }

    /// Homography mapping `src` points onto `dst` points.
    pub fn homography(&self) -> Result<Homography, CalibrationError> {
        let (src, dst) = self.corners()?;
        homography_from_4pt(&src, &dst).ok_or(CalibrationError::Degenerate)
    }
}

/// Outcome of the calibration step for one invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CalibrationStatus {
    NotFound,
    Applied,
    Ignored(String),
}

pub fn sidecar_path(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CALIBRATION_FILE)
}

/// Warp `frame` through `spec`, keeping its size.
pub fn apply_calibration(
    frame: &image::RgbImage,
    spec: &CalibrationSpec,
) -> Result<image::RgbImage, CalibrationError> {
    let h_dst_from_src = spec.homography()?;
    let h_src_from_dst = h_dst_from_src
        .inverse()
        .ok_or(CalibrationError::Degenerate)?;

    let (width, height) = frame.dimensions();
    let warped = warp_perspective_rgb(
        &frame_view(frame),
        &h_src_from_dst,
        width as usize,
        height as usize,
        [0, 0, 0],
    );
    image::RgbImage::from_raw(width, height, warped.data)
        .ok_or(CalibrationError::Warp { width, height })
}

/// Apply the sidecar next to `input` when there is one. Never fails: a broken
/// sidecar is logged and the frame is returned unchanged.
pub fn apply_sidecar(frame: image::RgbImage, input: &Path) -> (image::RgbImage, CalibrationStatus) {
    let path = sidecar_path(input);
    if !path.is_file() {
        return (frame, CalibrationStatus::NotFound);
    }

    let warped = CalibrationSpec::load_json(&path).and_then(|spec| apply_calibration(&frame, &spec));
    match warped {
        Ok(warped) => {
            info!("calibration applied from {}", path.display());
            (warped, CalibrationStatus::Applied)
        }
        Err(err) => {
            warn!("Calibration ignored: {err}");
            (frame, CalibrationStatus::Ignored(err.to_string()))
        }
    }
}
