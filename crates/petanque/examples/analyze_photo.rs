//! Analyze a photo with parameters from a JSON file and print the ranking.
//!
//! ```text
//! cargo run -p petanque --example analyze_photo -- court.jpg [params.json]
//! ```

use std::env;
use std::path::PathBuf;

use petanque::{AnalysisParams, AnalysisReport, Pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: analyze_photo <image_path> [params.json]");
        return Ok(());
    };
    let params = match args.next() {
        Some(path) => AnalysisParams::load_json(path)?,
        None => AnalysisParams::default(),
    };

    let pipeline = Pipeline::new(params);
    let mut report = AnalysisReport::new(&input, pipeline.params().jack_color);
    let analysis = match pipeline.analyze(&input, &mut report) {
        Ok(analysis) => analysis,
        Err(err) => {
            report.set_error(&err);
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Err(err.into());
        }
    };

    println!(
        "jack at ({:.1}, {:.1}), {} detector attempt(s)",
        analysis.ranking.jack.circle.x,
        analysis.ranking.jack.circle.y,
        analysis.detection.attempts
    );
    for (rank, ball) in analysis.ranking.balls.iter().enumerate() {
        println!(
            "{:>2}. ball at ({:.1}, {:.1}) r={:.1}  {}",
            rank + 1,
            ball.ball.circle.x,
            ball.ball.circle.y,
            ball.ball.circle.r,
            petanque::distance_label(ball.distance_px)
        );
    }
    Ok(())
}
