use serde::{Deserialize, Serialize};

/// A detected circle in working-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center x (pixels).
    pub x: f32,
    /// Center y (pixels).
    pub y: f32,
    /// Radius (pixels).
    pub r: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }

    /// Euclidean distance between the two centers.
    #[inline]
    pub fn center_distance(&self, other: &Circle) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Role assigned to a circle by the classifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleKind {
    Jack,
    Ball,
}
