//! Jack selection and ball ranking.
//!
//! - `JackClassifier` splits a detection set into one jack and the balls,
//!   either by radius alone (`JackColor::Any`) or by a color-aware score.
//! - `rank_balls` orders the balls by pixel distance to the jack.

mod classify;
mod params;
mod rank;

pub use classify::{
    jack_score, sample_circle_color, Classification, ClassifiedCircle, JackClassifier,
};
pub use params::{ClassifierParams, HueBand, JackColor, UnknownJackColor};
pub use rank::{rank_balls, RankedBall, Ranking, NO_BALL_INDEX};
