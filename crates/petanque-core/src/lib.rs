//! Core types and utilities for pétanque photo analysis.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image decoder or image type: frames are passed
//! around as lightweight interleaved RGB views.

mod circle;
mod color;
mod homography;
mod image;
mod logger;

pub use circle::{Circle, CircleKind};
pub use color::{mean_hsv_in_rect, rgb_to_hsv, Hsv};
pub use homography::{homography_from_4pt, warp_perspective_rgb, Homography};
pub use image::{sample_bilinear_rgb, RgbImage, RgbImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, stage_of};
