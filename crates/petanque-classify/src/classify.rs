use log::debug;
use petanque_core::{mean_hsv_in_rect, Circle, CircleKind, Hsv, RgbImageView};
use serde::{Deserialize, Serialize};

use crate::{ClassifierParams, JackColor};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A circle with its assigned role and, in color-aware modes, the sampled
/// color and jack score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCircle {
    pub circle: Circle,
    pub kind: CircleKind,
    #[serde(default)]
    pub color: Option<Hsv>,
    #[serde(default)]
    pub score: Option<f32>,
}

/// One optional jack and the balls, disjoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub jack: Option<ClassifiedCircle>,
    pub balls: Vec<ClassifiedCircle>,
}

impl Classification {
    /// A jack and at least one ball.
    pub fn is_conclusive(&self) -> bool {
        self.jack.is_some() && !self.balls.is_empty()
    }
}

/// Mean HSV of the central square of `circle` (side `2 * max(1, round(frac * r))`).
///
/// Circles whose sample square lies entirely outside the frame read as black.
pub fn sample_circle_color(frame: &RgbImageView<'_>, circle: &Circle, half_frac: f32) -> Hsv {
    let half = (circle.r * half_frac).round().max(1.0) as i64;
    let x0 = ((circle.x.round() as i64) - half).max(0);
    let y0 = ((circle.y.round() as i64) - half).max(0);
    match mean_hsv_in_rect(frame, x0, y0, 2 * half, 2 * half) {
        Some(hsv) => hsv,
        None => {
            debug!(
                "circle ({:.1}, {:.1}) r={:.1} has no pixels to sample",
                circle.x, circle.y, circle.r
            );
            Hsv::default()
        }
    }
}

/// `1/r + S/255`, plus the hue bonus when `mode` has a band containing the hue.
///
/// A heuristic: small and saturated wins. Jacks are often described as the
/// least saturated object on the court, but the score deliberately rewards
/// saturation, so a pale jack needs the hue bonus of an explicit color.
/// In `auto` there is no hue bonus and a saturated ball can outscore it.
pub fn jack_score(circle: &Circle, color: &Hsv, mode: JackColor, params: &ClassifierParams) -> f32 {
    let inv_r = if circle.r > 0.0 { 1.0 / circle.r } else { 0.0 };
    let mut score = inv_r + color.saturation / 255.0;
    if params
        .band_for(mode)
        .is_some_and(|band| band.contains(color.hue))
    {
        score += params.hue_bonus;
    }
    score
}

/// Splits detections into a jack and balls.
pub struct JackClassifier {
    params: ClassifierParams,
}

impl JackClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(circles = circles.len(), mode = %mode))
    )]
    pub fn classify(
        &self,
        frame: &RgbImageView<'_>,
        circles: &[Circle],
        mode: JackColor,
    ) -> Classification {
        if circles.is_empty() {
            return Classification::default();
        }
        if mode.is_color_aware() {
            self.classify_by_score(frame, circles, mode)
        } else {
            classify_by_radius(circles)
        }
    }

    fn classify_by_score(
        &self,
        frame: &RgbImageView<'_>,
        circles: &[Circle],
        mode: JackColor,
    ) -> Classification {
        let scored: Vec<(Circle, Hsv, f32)> = circles
            .iter()
            .map(|c| {
                let color = sample_circle_color(frame, c, self.params.sample_half_frac);
                let score = jack_score(c, &color, mode, &self.params);
                debug!(
                    "circle ({:.1}, {:.1}) r={:.1}: hue={:.1} sat={:.1} score={:.4}",
                    c.x, c.y, c.r, color.hue, color.saturation, score
                );
                (*c, color, score)
            })
            .collect();

        // strict comparison: the first of equal scores wins
        let mut best = 0usize;
        for (i, s) in scored.iter().enumerate().skip(1) {
            if s.2 > scored[best].2 {
                best = i;
            }
        }

        let tag = |(circle, color, score): (Circle, Hsv, f32), kind| ClassifiedCircle {
            circle,
            kind,
            color: Some(color),
            score: Some(score),
        };

        let mut out = Classification::default();
        for (i, s) in scored.into_iter().enumerate() {
            if i == best {
                out.jack = Some(tag(s, CircleKind::Jack));
            } else {
                out.balls.push(tag(s, CircleKind::Ball));
            }
        }
        out
    }
}

fn classify_by_radius(circles: &[Circle]) -> Classification {
    let mut by_radius = circles.to_vec();
    by_radius.sort_by(|a, b| a.r.total_cmp(&b.r));

    let mut iter = by_radius.into_iter().map(|circle| ClassifiedCircle {
        circle,
        kind: CircleKind::Ball,
        color: None,
        score: None,
    });
    let jack = iter.next().map(|mut c| {
        c.kind = CircleKind::Jack;
        c
    });
    Classification {
        jack,
        balls: iter.collect(),
    }
}
