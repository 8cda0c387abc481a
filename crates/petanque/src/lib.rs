//! Facade crate for the `petanque-*` workspace.
//!
//! Finds the jack and the balls in a photo of a pétanque court and ranks the
//! balls by pixel distance to the jack.
//!
//! Stages, in order:
//! - load: decode, resize to the working resolution, optional four-point
//!   calibration from a `calibration.json` sidecar
//! - detect: grayscale, Gaussian blur and a gradient Hough circle detector
//!   with one relaxed retry (`petanque_hough`)
//! - classify and rank: jack selection by size or color, distance sort
//!   (`petanque_classify`)
//! - output: annotated image, JSON record and an optional diagnostic report
//!
//! ## Quickstart
//!
//! ```no_run
//! use petanque::{analyze_file, AnalysisParams, JackColor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = AnalysisParams {
//!     jack_color: JackColor::Yellow,
//!     ..AnalysisParams::default()
//! };
//! let analysis = analyze_file("court.jpg", &params)?;
//! let record = analysis.record();
//! println!("closest ball at {:.0}px", record.balls[0].distance_px);
//! # Ok(())
//! # }
//! ```
//!
//! All distances are in working-frame pixels, i.e. after resizing and
//! calibration.

pub use petanque_classify as classify;
pub use petanque_core as core;
pub use petanque_hough as hough;

pub use petanque_classify::{JackColor, Ranking};
pub use petanque_core::Circle;

mod annotate;
mod calibration;
mod config;
mod error;
mod load;
mod pipeline;
mod report;

pub use annotate::{annotate, distance_label, draw_text, save_annotated, text_size};
pub use calibration::{
    apply_calibration, apply_sidecar, sidecar_path, CalibrationSpec, CalibrationStatus,
    CALIBRATION_FILE,
};
pub use config::{AnalysisParams, AnnotateParams, LoaderParams};
pub use error::{AnalysisError, CalibrationError, ConfigError};
pub use load::{
    decode_image, fit_resolution, frame_view, load_frame, working_size, FrameSize, LoadedFrame,
};
pub use pipeline::{analyze_file, run, Analysis, AnalysisRequest, Pipeline};
pub use report::{AnalysisRecord, AnalysisReport, BallRecord, CircleRecord, DetectionSummary};

/// Install the log backend for binaries: the stage logger, or with the
/// `tracing` feature a `tracing` subscriber that also receives `log` records.
pub fn init_logging(level: log::LevelFilter, json: bool) {
    #[cfg(feature = "tracing")]
    {
        let _ = level;
        petanque_core::init_tracing(json);
        let _ = tracing_log::LogTracer::init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = json;
        let _ = petanque_core::init_with_level(level);
    }
}
