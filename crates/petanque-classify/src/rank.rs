use serde::{Deserialize, Serialize};

use crate::ClassifiedCircle;

/// Value of `closest_ball_index` when there are no balls.
pub const NO_BALL_INDEX: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedBall {
    pub ball: ClassifiedCircle,
    /// Center-to-center distance to the jack in working-frame pixels.
    pub distance_px: f32,
}

/// Balls sorted by ascending distance to the jack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub jack: ClassifiedCircle,
    pub balls: Vec<RankedBall>,
    /// `0` when at least one ball exists, otherwise [`NO_BALL_INDEX`].
    pub closest_ball_index: i32,
}

impl Ranking {
    pub fn closest(&self) -> Option<&RankedBall> {
        self.balls.first()
    }
}

/// Ranks `balls` by distance to `jack`. Equal distances keep input order.
pub fn rank_balls(jack: ClassifiedCircle, balls: &[ClassifiedCircle]) -> Ranking {
    let mut ranked: Vec<RankedBall> = balls
        .iter()
        .map(|b| RankedBall {
            ball: *b,
            distance_px: jack.circle.center_distance(&b.circle),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_px.total_cmp(&b.distance_px));

    let closest_ball_index = if ranked.is_empty() { NO_BALL_INDEX } else { 0 };
    Ranking {
        jack,
        balls: ranked,
        closest_ball_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use petanque_core::{Circle, CircleKind};

    fn tagged(x: f32, y: f32, r: f32, kind: CircleKind) -> ClassifiedCircle {
        ClassifiedCircle {
            circle: Circle::new(x, y, r),
            kind,
            color: None,
            score: None,
        }
    }

    fn ball(x: f32, y: f32) -> ClassifiedCircle {
        tagged(x, y, 30.0, CircleKind::Ball)
    }

    #[test]
    fn balls_sorted_by_distance() {
        let jack = tagged(100.0, 100.0, 10.0, CircleKind::Jack);
        let balls = [ball(400.0, 100.0), ball(130.0, 140.0), ball(100.0, 300.0)];
        let r = rank_balls(jack, &balls);
        let d: Vec<f32> = r.balls.iter().map(|b| b.distance_px).collect();
        assert_abs_diff_eq!(d[0], 50.0, epsilon = 1e-4);
        assert_abs_diff_eq!(d[1], 200.0, epsilon = 1e-4);
        assert_abs_diff_eq!(d[2], 300.0, epsilon = 1e-4);
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(r.closest_ball_index, 0);
        assert_eq!(r.closest().map(|b| b.ball.circle), Some(balls[1].circle));
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let jack = tagged(0.0, 0.0, 10.0, CircleKind::Jack);
        let balls = [ball(0.0, 50.0), ball(50.0, 0.0), ball(-50.0, 0.0)];
        let r = rank_balls(jack, &balls);
        let order: Vec<Circle> = r.balls.iter().map(|b| b.ball.circle).collect();
        assert_eq!(
            order,
            vec![balls[0].circle, balls[1].circle, balls[2].circle]
        );
    }

    #[test]
    fn no_balls_reports_sentinel_index() {
        let jack = tagged(10.0, 10.0, 5.0, CircleKind::Jack);
        let r = rank_balls(jack, &[]);
        assert!(r.balls.is_empty());
        assert_eq!(r.closest_ball_index, NO_BALL_INDEX);
        assert!(r.closest().is_none());
    }

    #[test]
    fn diagonal_scenario_distance() {
        let jack = tagged(100.0, 100.0, 10.0, CircleKind::Jack);
        let r = rank_balls(jack, &[ball(300.0, 300.0)]);
        assert_abs_diff_eq!(r.balls[0].distance_px, 282.842_7, epsilon = 1e-3);
    }
}
