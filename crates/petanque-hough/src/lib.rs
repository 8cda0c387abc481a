//! Circle detection for pétanque court photos.
//!
//! Pipeline:
//! 1. Convert the working frame to grayscale and smooth it with a fixed
//!    separable Gaussian (`preprocess`).
//! 2. Extract a thin edge map with Sobel gradients, non-maximum suppression
//!    and hysteresis (`edges`).
//! 3. Every edge pixel votes along both gradient directions for centers at
//!    distances inside the radius band (`accumulator`).
//! 4. Accumulator peaks above the vote threshold become centers; each center
//!    gets the radius best supported by the edge-distance histogram.
//! 5. If the strict threshold yields fewer than two circles, extraction is
//!    repeated once with the relaxed threshold (`detector`).

mod accumulator;
mod detector;
mod edges;
mod params;
mod preprocess;

pub use accumulator::HoughVotes;
pub use detector::{CircleDetector, DetectionOutcome};
pub use edges::{detect_edges, EdgeMap, EdgePoint};
pub use params::{HoughParams, PreprocessParams};
pub use preprocess::{gaussian_blur, gaussian_kernel, preprocess, to_gray};
