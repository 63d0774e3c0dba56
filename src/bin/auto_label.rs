use autolabeler::config::{
    BackgroundConfig, DEFAULT_MIN_OBJECT_AREA, DEFAULT_SECONDS_PER_SAMPLE, LabelerConfig,
};
use autolabeler::labeling::labeler::run_labeler;
use autolabeler::logging::init_logging;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Auto-label a single object class from a stationary-camera video using background
/// subtraction. Writes YOLO images and labels, appending to an existing dataset.
#[derive(Parser, Debug)]
#[command(name = "auto_label", version)]
struct Args {
    /// Path to input video file
    video: PathBuf,
    /// Class name (e.g. wheel, dc_motor)
    #[arg(long)]
    class_name: String,
    /// Output directory for dataset
    #[arg(long)]
    output_dir: PathBuf,
    /// Extract 1 frame per N seconds
    #[arg(long, default_value_t = DEFAULT_SECONDS_PER_SAMPLE)]
    fps_sample: u32,
    /// Minimum object area in pixels
    #[arg(long, default_value_t = DEFAULT_MIN_OBJECT_AREA)]
    min_size: u32,
    /// First frame index (default: append to existing dataset)
    #[arg(long)]
    start_index: Option<u32>,
    /// Frames of history kept by the background model
    #[arg(long, default_value_t = BackgroundConfig::default().history)]
    history: u32,
    /// Variance threshold of the background model
    #[arg(long, default_value_t = BackgroundConfig::default().var_threshold)]
    var_threshold: f32,
    /// Treat shadows as foreground
    #[arg(long)]
    no_shadows: bool,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = LabelerConfig {
        seconds_per_sample: args.fps_sample,
        min_object_area: args.min_size,
        start_index: args.start_index,
        background: BackgroundConfig {
            history: args.history,
            var_threshold: args.var_threshold,
            detect_shadows: !args.no_shadows,
        },
        ..LabelerConfig::new(args.video, args.class_name, args.output_dir)
    };

    match run_labeler(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
