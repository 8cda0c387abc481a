//! Stderr logging for the analysis stages.
//!
//! Records are tagged with the pipeline stage that emitted them, taken from
//! the module path: `+  412ms  INFO detect    | 2 circle(s) ...`. Install it
//! with [`init_with_level`]. With the `tracing` feature, [`init_tracing`]
//! installs a `tracing-subscriber` formatter that reports span timings
//! per stage instead.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Pipeline stage for a log target such as `petanque_hough::detector`.
///
/// Targets outside the workspace keep their crate name.
pub fn stage_of(target: &str) -> &str {
    let mut parts = target.split("::");
    let krate = parts.next().unwrap_or(target);
    let module = parts.next();
    match (krate, module) {
        ("petanque_hough", _) => "detect",
        ("petanque_classify", Some("rank")) => "rank",
        ("petanque_classify", _) => "classify",
        ("petanque_core", Some("homography")) | ("petanque", Some("calibration")) => "calibrate",
        ("petanque", Some("load")) => "load",
        ("petanque", Some("annotate")) => "annotate",
        ("petanque" | "petanque_distance", _) => "pipeline",
        _ => krate,
    }
}

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let millis = self.started.elapsed().as_millis();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "+{:>5}ms {:>5} {:<9} | {}",
            millis,
            record.level(),
            stage_of(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr, tagged by stage.
/// Later calls keep the first logger.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StageLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
