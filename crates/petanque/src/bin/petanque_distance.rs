use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use petanque::{init_logging, run, AnalysisParams, AnalysisRequest, JackColor};

/// Find the jack and the balls in a pétanque photo and rank the balls by
/// pixel distance to the jack.
#[derive(Parser, Debug)]
#[command(name = "petanque-distance", version, about)]
struct Cli {
    /// Input photo.
    input: PathBuf,
    /// Annotated output image.
    #[arg(long, default_value = "annotated.png")]
    out: PathBuf,
    /// JSON result file.
    #[arg(long, default_value = "result.json")]
    json: PathBuf,
    /// Jack color hint: auto, yellow, orange or any.
    #[arg(long)]
    jack_color: Option<JackColor>,
    /// Upscale frames whose longer side is below this.
    #[arg(long)]
    min_res: Option<u32>,
    /// Downscale frames whose longer side exceeds this.
    #[arg(long)]
    max_res: Option<u32>,
    /// JSON parameter file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Diagnostic report, written on success and on failure.
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Emit logs as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn params(&self) -> Result<AnalysisParams, petanque::ConfigError> {
        let mut params = match &self.config {
            Some(path) => AnalysisParams::load_json(path)?,
            None => AnalysisParams::default(),
        };
        if let Some(mode) = self.jack_color {
            params.jack_color = mode;
        }
        if let Some(min_res) = self.min_res {
            params.loader.min_resolution = min_res;
        }
        if self.max_res.is_some() {
            params.loader.max_resolution = self.max_res;
        }
        Ok(params)
    }

    fn json_logs(&self) -> bool {
        #[cfg(feature = "tracing")]
        return self.json_logs;
        #[cfg(not(feature = "tracing"))]
        false
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.json_logs());

    let params = match cli.params() {
        Ok(params) => params,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let request = AnalysisRequest {
        input: cli.input,
        annotated_path: cli.out,
        json_path: cli.json,
        report_path: cli.report,
        params,
    };

    match run(&request) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
