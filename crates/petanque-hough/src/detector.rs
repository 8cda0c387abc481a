use image::GrayImage;
use log::{debug, info};
use petanque_core::Circle;
use serde::{Deserialize, Serialize};

use crate::{detect_edges, HoughParams, HoughVotes};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Fewer circles than this after the strict attempt triggers the retry.
const MIN_CIRCLES_BEFORE_RETRY: usize = 2;

/// Circles from the accepted attempt plus how they were obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Detection set in emission order (strongest center first).
    pub circles: Vec<Circle>,
    /// 1 when the strict attempt sufficed, 2 when the relaxed retry ran.
    pub attempts: u8,
    /// Vote threshold of the attempt whose circles are returned.
    pub vote_threshold: u32,
}

/// Hough circle detector with a single relaxed retry.
pub struct CircleDetector {
    params: HoughParams,
}

impl CircleDetector {
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HoughParams {
        &self.params
    }

    /// Edge extraction and voting; shared by both attempts.
    pub fn vote(&self, gray: &GrayImage) -> HoughVotes {
        let edges = detect_edges(gray, self.params.edge_threshold);
        debug!(
            "edge map: {} pixels on {}x{}",
            edges.len(),
            edges.width,
            edges.height
        );
        HoughVotes::accumulate(edges, &self.params)
    }

    /// One detection pass at an explicit threshold.
    pub fn detect_once(&self, gray: &GrayImage, vote_threshold: u32) -> Vec<Circle> {
        self.vote(gray).extract(vote_threshold)
    }

    /// Strict pass, then at most one relaxed pass over the same votes when
    /// fewer than two circles were found. An empty result after the retry is
    /// left to the caller to treat as fatal.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, gray), fields(width = gray.width(), height = gray.height()))
    )]
    pub fn detect(&self, gray: &GrayImage) -> DetectionOutcome {
        let votes = self.vote(gray);

        let thresholds = [self.params.vote_threshold, self.params.retry_vote_threshold];
        let mut outcome = DetectionOutcome {
            circles: Vec::new(),
            attempts: 0,
            vote_threshold: thresholds[0],
        };

        for (attempt, &threshold) in thresholds.iter().enumerate() {
            outcome.circles = votes.extract(threshold);
            outcome.attempts = attempt as u8 + 1;
            outcome.vote_threshold = threshold;
            info!(
                "hough attempt {} (threshold {}): {} circle(s)",
                outcome.attempts,
                threshold,
                outcome.circles.len()
            );
            if outcome.circles.len() >= MIN_CIRCLES_BEFORE_RETRY {
                break;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{preprocess, PreprocessParams};
    use petanque_core::RgbImage;

    fn court(w: usize, h: usize, discs: &[(f32, f32, f32, [u8; 3])]) -> RgbImage {
        let mut img = RgbImage::filled(w, h, [25, 35, 25]);
        for y in 0..h {
            for x in 0..w {
                for &(cx, cy, r, rgb) in discs {
                    if (x as f32 - cx).hypot(y as f32 - cy) <= r {
                        let i = (y * w + x) * 3;
                        img.data[i..i + 3].copy_from_slice(&rgb);
                    }
                }
            }
        }
        img
    }

    fn smoothed(frame: &RgbImage) -> GrayImage {
        preprocess(&frame.view(), &PreprocessParams::default())
    }

    #[test]
    fn two_clear_circles_need_one_attempt() {
        let frame = court(
            720,
            540,
            &[
                (100.0, 100.0, 10.0, [240, 220, 60]),
                (300.0, 300.0, 40.0, [200, 200, 210]),
            ],
        );
        let outcome = CircleDetector::new(HoughParams::default()).detect(&smoothed(&frame));
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.vote_threshold, 20);
        assert_eq!(outcome.circles.len(), 2, "{:?}", outcome.circles);

        let small = outcome
            .circles
            .iter()
            .min_by(|a, b| a.r.total_cmp(&b.r))
            .expect("two circles");
        assert!((small.x - 100.0).abs() < 2.0 && (small.y - 100.0).abs() < 2.0);
        assert!((small.r - 10.0).abs() < 2.0, "r={}", small.r);
    }

    #[test]
    fn single_circle_triggers_exactly_one_retry() {
        let frame = court(720, 540, &[(360.0, 270.0, 50.0, [210, 210, 210])]);
        let outcome = CircleDetector::new(HoughParams::default()).detect(&smoothed(&frame));
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.vote_threshold, 16);
        assert!(!outcome.circles.is_empty());
    }

    #[test]
    fn black_frame_yields_nothing_after_two_attempts() {
        let frame = RgbImage::filled(720, 720, [0, 0, 0]);
        let outcome = CircleDetector::new(HoughParams::default()).detect(&smoothed(&frame));
        assert_eq!(outcome.attempts, 2);
        assert!(outcome.circles.is_empty());
    }

    #[test]
    fn detect_once_matches_strict_attempt() {
        let frame = court(720, 540, &[(200.0, 200.0, 30.0, [220, 220, 220])]);
        let gray = smoothed(&frame);
        let detector = CircleDetector::new(HoughParams::default());
        assert_eq!(
            detector.detect_once(&gray, 20),
            detector.vote(&gray).extract(20)
        );
    }
}
