use serde::{Deserialize, Serialize};

/// Grayscale smoothing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Gaussian kernel side (forced odd, at least 1).
    pub kernel_size: usize,
    /// Gaussian sigma in pixels. Non-positive values derive sigma from the
    /// kernel size.
    pub sigma: f32,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            kernel_size: 9,
            sigma: 2.0,
        }
    }
}

/// Hough circle detector settings.
///
/// Distances are given as fractions of the frame width so one parameter set
/// works across resolutions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Inverse accumulator resolution: one accumulator cell spans `dp` pixels.
    pub dp: f32,
    /// Minimum center-to-center distance, fraction of width.
    pub min_dist_frac: f32,
    /// Upper hysteresis threshold on the L1 Sobel magnitude; the lower
    /// threshold is half of it.
    pub edge_threshold: f32,
    /// Vote threshold of the first attempt (lower = more permissive).
    pub vote_threshold: u32,
    /// Vote threshold of the single relaxed retry.
    pub retry_vote_threshold: u32,
    /// Smallest radius searched, fraction of width.
    pub min_radius_frac: f32,
    /// Largest radius searched, fraction of width.
    pub max_radius_frac: f32,
    /// Minimum fraction of the circumference that must be backed by edge
    /// pixels for a circle to be accepted.
    pub min_rim_coverage: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            dp: 1.2,
            min_dist_frac: 0.05,
            edge_threshold: 120.0,
            vote_threshold: 20,
            retry_vote_threshold: 16,
            min_radius_frac: 0.01,
            max_radius_frac: 0.12,
            min_rim_coverage: 0.3,
        }
    }
}

impl HoughParams {
    /// Radius band `[r_min, r_max]` in pixels for a frame of this width.
    pub fn radius_band(&self, width: usize) -> (f32, f32) {
        let w = width as f32;
        let r_min = (w * self.min_radius_frac).round().max(1.0);
        let r_max = (w * self.max_radius_frac).round().max(r_min + 1.0);
        (r_min, r_max)
    }

    pub fn min_dist(&self, width: usize) -> f32 {
        (width as f32 * self.min_dist_frac).max(1.0)
    }

    pub(crate) fn cell_size(&self) -> f32 {
        if self.dp.is_finite() && self.dp >= 1.0 {
            self.dp
        } else {
            1.0
        }
    }
}
