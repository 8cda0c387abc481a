use std::path::PathBuf;

/// Fatal pipeline failures. Each one aborts the invocation.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("No circles detected")]
    NoCirclesDetected,
    #[error("Jack or balls not found")]
    ClassificationInconclusive,
    #[error("cannot write annotated image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("output {path} would overwrite the input image")]
    OutputOverwritesInput { path: PathBuf },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reasons a calibration sidecar is ignored. Never fatal.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid calibration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected 4 src and 4 dst points, got {src} and {dst}")]
    PointCount { src: usize, dst: usize },
    #[error("calibration points are degenerate")]
    Degenerate,
    #[error("warped frame has inconsistent dimensions {width}x{height}")]
    Warp { width: u32, height: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
