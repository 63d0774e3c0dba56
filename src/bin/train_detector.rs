use autolabeler::config::{DEFAULT_RUN_NAME, ProjectConfig, ProjectLayout};
use autolabeler::logging::init_logging;
use autolabeler::training::trainer::{TrainingOutcome, train};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Train a YOLO detector on a dataset produced by auto_label.
#[derive(Parser, Debug)]
#[command(name = "train_detector", version)]
struct Args {
    /// Project root holding dataset/ and runs/
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
    /// Dataset and run name (default: from the project config, else "wheel")
    #[arg(long)]
    run_name: Option<String>,
    /// JSON project config (default: <project-root>/autolabel.json if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of epochs
    #[arg(long)]
    epochs: Option<u32>,
    /// Skip the ONNX export after training
    #[arg(long)]
    no_export: bool,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let project = match ProjectConfig::load(&args.project_root, args.config.as_deref()) {
        Ok(project) => project,
        Err(e) => {
            error!("Could not read project config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let run_name = args
        .run_name
        .or(project.run_name)
        .unwrap_or_else(|| DEFAULT_RUN_NAME.to_string());
    let layout = ProjectLayout::new(&args.project_root, run_name);
    let mut trainer = project.trainer;
    if let Some(epochs) = args.epochs {
        trainer.epochs = epochs;
    }
    if args.no_export {
        trainer.export_onnx = false;
    }

    match train(&layout, &trainer) {
        Ok(TrainingOutcome::MissingDatasetConfig(path)) => {
            println!("Missing {}. Run auto_label first.", path.display());
            ExitCode::SUCCESS
        }
        Ok(TrainingOutcome::Trained { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Training failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
