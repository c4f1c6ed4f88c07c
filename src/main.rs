use anyhow::Result;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pose_compare::config::Config;
use pose_compare::error::SetupError;
use pose_compare::pipeline::{open_collaborators, Collaborators, Pipeline};
use pose_compare::pose::OnnxPoseDetector;
use pose_compare::video::FileBackend;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(version = env!("POSE_COMPARE_VERSION"), "pose-compare starting");
    info!(
        reference = %config.video.reference_path,
        output = %config.video.output_path,
        network = %config.detector.network,
        threshold = config.detector.threshold,
        overlay = %config.detector.overlay,
        "configuration loaded"
    );

    let input_path = prompt_input_path()?;

    let model = config.detector.model_type()?;
    let overlay = config.detector.overlay_flags()?;
    let detector = OnnxPoseDetector::new(&config.detector.model_path, model, config.detector.threshold)
        .map_err(|e| SetupError::detector_unavailable(&config.detector.model_path, e))?;

    let Collaborators {
        input,
        reference,
        sink,
    } = open_collaborators(&mut FileBackend, &input_path, &config.video)?;

    let mut pipeline = Pipeline::new(input, reference, sink, detector, overlay);
    let report = pipeline.run();
    println!("{}", report);

    Ok(())
}

/// 入力動画のパスを標準入力から読む
fn prompt_input_path() -> Result<String> {
    print!("Please enter the path to the input video: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let path = input.trim();

    if path.is_empty() {
        anyhow::bail!("No input video path given");
    }
    Ok(path.to_string())
}
