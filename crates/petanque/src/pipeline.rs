use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use petanque_classify::{rank_balls, Classification, JackClassifier, Ranking};
use petanque_hough::{preprocess, CircleDetector, DetectionOutcome};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    annotate, frame_view, load_frame, save_annotated, AnalysisError, AnalysisParams,
    AnalysisRecord, AnalysisReport, AnnotateParams, CalibrationStatus, DetectionSummary,
    FrameSize,
};

/// Outcome of a successful analysis. Owns the working frame so the
/// annotator can draw on it without another copy.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub frame: image::RgbImage,
    pub source_size: FrameSize,
    pub scale: f32,
    pub calibration: CalibrationStatus,
    pub detection: DetectionOutcome,
    pub classification: Classification,
    pub ranking: Ranking,
}

impl Analysis {
    pub fn record(&self) -> AnalysisRecord {
        AnalysisRecord::from(&self.ranking)
    }

    /// Consume the analysis and render the overlay onto its working frame.
    pub fn into_annotated(self, params: &AnnotateParams) -> (image::RgbImage, AnalysisRecord) {
        let record = self.record();
        (annotate(self.frame, &self.ranking, params), record)
    }
}

/// Stage objects built once from immutable parameters.
pub struct Pipeline {
    params: AnalysisParams,
    detector: CircleDetector,
    classifier: JackClassifier,
}

impl Pipeline {
    pub fn new(params: AnalysisParams) -> Self {
        let detector = CircleDetector::new(params.hough.clone());
        let classifier = JackClassifier::new(params.classifier.clone());
        Self {
            params,
            detector,
            classifier,
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Run every stage on `path`, recording progress into `report`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(path = %path.display(), jack_color = %self.params.jack_color))
    )]
    pub fn analyze(
        &self,
        path: &Path,
        report: &mut AnalysisReport,
    ) -> Result<Analysis, AnalysisError> {
        let loaded = load_frame(path, &self.params.loader)?;
        report.source_size = Some(loaded.source_size);
        report.working_size = Some(FrameSize::of(&loaded.frame));
        report.scale = Some(loaded.scale);
        report.calibration = Some(loaded.calibration.clone());

        let detection = {
            let gray = preprocess(&frame_view(&loaded.frame), &self.params.preprocess);
            self.detector.detect(&gray)
        };
        report.detection = Some(DetectionSummary::from(&detection));
        if detection.circles.is_empty() {
            return Err(AnalysisError::NoCirclesDetected);
        }

        let classification = self.classifier.classify(
            &frame_view(&loaded.frame),
            &detection.circles,
            self.params.jack_color,
        );
        report.classified = classification
            .jack
            .iter()
            .chain(classification.balls.iter())
            .copied()
            .collect();

        let jack = match classification.jack {
            Some(jack) if !classification.balls.is_empty() => jack,
            _ => return Err(AnalysisError::ClassificationInconclusive),
        };
        let ranking = rank_balls(jack, &classification.balls);
        report.result = Some(AnalysisRecord::from(&ranking));

        info!(
            "jack at ({:.1}, {:.1}) r={:.1}; {} ball(s), closest at {:.1}px",
            jack.circle.x,
            jack.circle.y,
            jack.circle.r,
            ranking.balls.len(),
            ranking.balls.first().map_or(f32::NAN, |b| b.distance_px)
        );

        Ok(Analysis {
            frame: loaded.frame,
            source_size: loaded.source_size,
            scale: loaded.scale,
            calibration: loaded.calibration,
            detection,
            classification,
            ranking,
        })
    }
}

/// Analyze one image without writing anything.
pub fn analyze_file(
    path: impl AsRef<Path>,
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    let path = path.as_ref();
    let mut report = AnalysisReport::new(path, params.jack_color);
    Pipeline::new(params.clone()).analyze(path, &mut report)
}

/// One invocation: an input image and where its artifacts go.
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    pub input: PathBuf,
    pub annotated_path: PathBuf,
    pub json_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub params: AnalysisParams,
}

impl AnalysisRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            annotated_path: PathBuf::from("annotated.png"),
            json_path: PathBuf::from("result.json"),
            report_path: None,
            params: AnalysisParams::default(),
        }
    }
}

/// Outputs this run has written, or created before a write failed.
#[derive(Default)]
struct Written<'a> {
    paths: Vec<&'a Path>,
}

impl<'a> Written<'a> {
    /// Run `write` for `path`. The path is remembered when the write
    /// succeeds or when a failed write leaves behind a file that was not
    /// there before.
    fn track(
        &mut self,
        path: &'a Path,
        write: impl FnOnce() -> Result<(), AnalysisError>,
    ) -> Result<(), AnalysisError> {
        let existed = path.exists();
        let outcome = write();
        if outcome.is_ok() || (!existed && path.exists()) {
            self.paths.push(path);
        }
        outcome
    }

    fn remove(&self) {
        for path in &self.paths {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => debug!("removed {}", path.display()),
                Err(err) => warn!("cannot remove {}: {err}", path.display()),
            }
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Refuse any output path that names the input image.
fn check_outputs(req: &AnalysisRequest) -> Result<(), AnalysisError> {
    let outputs = [
        Some(&req.annotated_path),
        Some(&req.json_path),
        req.report_path.as_ref(),
    ];
    match outputs
        .into_iter()
        .flatten()
        .find(|path| same_file(path, &req.input))
    {
        Some(path) => Err(AnalysisError::OutputOverwritesInput { path: path.clone() }),
        None => Ok(()),
    }
}

fn write_artifacts<'a>(
    req: &'a AnalysisRequest,
    report: &mut AnalysisReport,
    written: &mut Written<'a>,
) -> Result<(), AnalysisError> {
    let analysis = Pipeline::new(req.params.clone()).analyze(&req.input, report)?;
    let (annotated, record) = analysis.into_annotated(&req.params.annotate);
    written.track(&req.annotated_path, || {
        save_annotated(&annotated, &req.annotated_path)
    })?;
    drop(annotated);
    written.track(&req.json_path, || record.write_json(&req.json_path))
}

/// Analyze `req.input` and write the annotated image and the JSON record.
///
/// On failure the outputs this run wrote are removed again; files that were
/// already at those paths and were never touched stay. A request whose
/// outputs name the input image is rejected before anything is read or
/// written. Otherwise the diagnostic report, when requested, is written in
/// both cases and carries the error message.
pub fn run(req: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
    check_outputs(req)?;

    let mut report = AnalysisReport::new(&req.input, req.params.jack_color);
    let mut written = Written::default();
    let outcome = write_artifacts(req, &mut report, &mut written);
    if let Err(err) = &outcome {
        written.remove();
        report.set_error(err);
    }

    if let Some(path) = &req.report_path {
        match (&outcome, report.write_json(path)) {
            (Ok(()), Err(err)) => {
                written.remove();
                return Err(err);
            }
            (Err(_), Err(err)) => warn!("cannot write report {}: {err}", path.display()),
            (_, Ok(())) => {}
        }
    }

    outcome.map(|()| report)
}
