//! The result record consumed by callers and the optional diagnostic report.

use std::fs;
use std::path::Path;

use petanque_classify::{ClassifiedCircle, JackColor, Ranking};
use petanque_core::Circle;
use petanque_hough::DetectionOutcome;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, CalibrationStatus, FrameSize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleRecord {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl From<&Circle> for CircleRecord {
    fn from(c: &Circle) -> Self {
        Self {
            x: c.x,
            y: c.y,
            r: c.r,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub distance_px: f32,
}

/// `{ jack, balls, closest_ball_index }`, balls nearest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub jack: Option<CircleRecord>,
    pub balls: Vec<BallRecord>,
    pub closest_ball_index: i32,
}

impl From<&Ranking> for AnalysisRecord {
    fn from(ranking: &Ranking) -> Self {
        Self {
            jack: Some(CircleRecord::from(&ranking.jack.circle)),
            balls: ranking
                .balls
                .iter()
                .map(|b| BallRecord {
                    x: b.ball.circle.x,
                    y: b.ball.circle.y,
                    r: b.ball.circle.r,
                    distance_px: b.distance_px,
                })
                .collect(),
            closest_ball_index: ranking.closest_ball_index,
        }
    }
}

impl AnalysisRecord {
    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalysisError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub circles: usize,
    pub attempts: u8,
    pub vote_threshold: u32,
}

impl From<&DetectionOutcome> for DetectionSummary {
    fn from(outcome: &DetectionOutcome) -> Self {
        Self {
            circles: outcome.circles.len(),
            attempts: outcome.attempts,
            vote_threshold: outcome.vote_threshold,
        }
    }
}

/// Everything one invocation learned, filled stage by stage. Written even
/// when the analysis fails, with `error` set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub input_path: String,
    pub jack_color: JackColor,
    #[serde(default)]
    pub source_size: Option<FrameSize>,
    #[serde(default)]
    pub working_size: Option<FrameSize>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub calibration: Option<CalibrationStatus>,
    #[serde(default)]
    pub detection: Option<DetectionSummary>,
    #[serde(default)]
    pub classified: Vec<ClassifiedCircle>,
    #[serde(default)]
    pub result: Option<AnalysisRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalysisReport {
    pub fn new(input: &Path, jack_color: JackColor) -> Self {
        Self {
            input_path: input.to_string_lossy().into_owned(),
            jack_color,
            source_size: None,
            working_size: None,
            scale: None,
            calibration: None,
            detection: None,
            classified: Vec::new(),
            result: None,
            error: None,
        }
    }

    pub fn set_error(&mut self, err: &AnalysisError) {
        self.error = Some(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalysisError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
