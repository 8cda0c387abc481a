//! Immutable analysis parameters and their JSON form.

use std::fs;
use std::path::Path;

use petanque_classify::{ClassifierParams, JackColor};
use petanque_hough::{HoughParams, PreprocessParams};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Working-resolution policy of the loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderParams {
    /// Frames whose longer side is below this are upscaled to it.
    pub min_resolution: u32,
    /// Frames whose longer side exceeds this are downscaled to it.
    pub max_resolution: Option<u32>,
    /// Look for `calibration.json` next to the input.
    pub use_calibration: bool,
}

impl Default for LoaderParams {
    fn default() -> Self {
        Self {
            min_resolution: 720,
            max_resolution: None,
            use_calibration: true,
        }
    }
}

/// Overlay colors (RGB) and stroke widths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateParams {
    pub jack_color: [u8; 3],
    pub ball_color: [u8; 3],
    pub line_color: [u8; 3],
    pub label_color: [u8; 3],
    pub jack_thickness: u32,
    pub ball_thickness: u32,
    /// Pixel size of one bitmap-font cell.
    pub label_scale: u32,
    /// Draw `1`, `2`, ... next to each ball in distance order.
    pub rank_numbers: bool,
}

impl Default for AnnotateParams {
    fn default() -> Self {
        Self {
            jack_color: [255, 255, 0],
            ball_color: [0, 0, 255],
            line_color: [0, 255, 0],
            label_color: [255, 255, 255],
            jack_thickness: 4,
            ball_thickness: 2,
            label_scale: 2,
            rank_numbers: true,
        }
    }
}

/// Every tunable of one analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub jack_color: JackColor,
    pub loader: LoaderParams,
    pub preprocess: PreprocessParams,
    pub hough: HoughParams,
    pub classifier: ClassifierParams,
    pub annotate: AnnotateParams,
}

impl AnalysisParams {
    /// Load a JSON config from disk. Missing fields keep their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
