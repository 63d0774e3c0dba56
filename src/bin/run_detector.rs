use autolabeler::config::{ProjectConfig, ProjectLayout, DEFAULT_RUN_NAME};
use autolabeler::error::AppError;
use autolabeler::logging::init_logging;
use autolabeler::object_detection::detection_record::records_to_json;
use autolabeler::object_detection::detector_runner::detect_image;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

/// Run the trained detector on an image and print JSON detections to stdout:
/// [{"label":"wheel","confidence":0.95,"bbox":[left,top,width,height]}, ...]
#[derive(Parser, Debug)]
#[command(name = "run_detector", version)]
struct Args {
    /// Path to image file
    image: PathBuf,
    /// Path to the ONNX model (default: runs/detect/<run>/weights/best.onnx)
    model: Option<PathBuf>,
    /// Min confidence, clamped to 0.01..0.99
    #[arg(long)]
    conf: Option<f32>,
    /// Maximum number of detections printed
    #[arg(long)]
    max_detections: Option<usize>,
    /// Label attached to every detection
    #[arg(long)]
    label: Option<String>,
    /// Project root holding runs/
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
    /// JSON project config (default: <project-root>/autolabel.json if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Callers parse stderr as JSON too, so failures print an empty list there.
fn fail() -> ExitCode {
    eprintln!("[]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let project = match ProjectConfig::load(&args.project_root, args.config.as_deref()) {
        Ok(project) => project,
        Err(e) => {
            error!("Could not read project config: {}", e);
            return fail();
        }
    };
    let run_name = project.run_name.clone().unwrap_or_else(|| DEFAULT_RUN_NAME.to_string());
    let model = args
        .model
        .unwrap_or_else(|| ProjectLayout::new(&args.project_root, run_name).default_model());

    let mut detector = project.detector;
    if let Some(conf) = args.conf {
        detector.confidence = conf;
    }
    if let Some(max_detections) = args.max_detections {
        detector.max_detections = max_detections;
    }
    if let Some(label) = args.label {
        detector.label = label;
    }

    let records = match detect_image(&args.image, &model, &detector) {
        Ok(records) => records,
        Err(AppError::NotFound(path)) => {
            debug!("Missing input {}", path.display());
            return fail();
        }
        Err(e) => {
            error!("Detection failed: {}", e);
            return fail();
        }
    };
    match records_to_json(&records) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Could not serialize detections: {}", e);
            fail()
        }
    }
}
