use crate::config::{ProjectLayout, TrainerConfig};
use crate::error::{AppError, AppResult};
use crate::video::ffmpeg::resolve_tool_path;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};
use walkdir::WalkDir;

/// How a training request ended.
#[derive(Clone, Debug, PartialEq)]
pub enum TrainingOutcome {
    /// The dataset descriptor does not exist; nothing was run.
    MissingDatasetConfig(PathBuf),
    Trained { weights: PathBuf, onnx: Option<PathBuf> },
}

/// Arguments for `yolo detect train`.
pub fn train_arguments(layout: &ProjectLayout, config: &TrainerConfig) -> Vec<OsString> {
    let mut data = OsString::from("data=");
    data.push(layout.dataset_config());
    let mut project = OsString::from("project=");
    project.push(layout.runs_dir());
    vec![
        "detect".into(),
        "train".into(),
        data,
        format!("model={}", config.base_model).into(),
        format!("epochs={}", config.epochs).into(),
        format!("imgsz={}", config.image_size).into(),
        format!("batch={}", config.batch).into(),
        project,
        format!("name={}", layout.run_name).into(),
        "exist_ok=True".into(),
    ]
}

/// Arguments for `yolo export`, turning trained weights into the ONNX model the
/// detector runner loads.
pub fn export_arguments(weights: &Path, config: &TrainerConfig) -> Vec<OsString> {
    let mut model = OsString::from("model=");
    model.push(weights);
    vec![
        "export".into(),
        model,
        "format=onnx".into(),
        format!("imgsz={}", config.image_size).into(),
    ]
}

/// Counts the images a dataset directory offers for training.
pub fn count_dataset_images(dataset_dir: &Path) -> usize {
    WalkDir::new(dataset_dir.join("images"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png")
                })
        })
        .count()
}

fn run_yolo(arguments: &[OsString]) -> AppResult<()> {
    let yolo_path = resolve_tool_path("yolo");
    let status = Command::new(&yolo_path)
        .args(arguments)
        .status()
        .map_err(|e| AppError::Training(format!("failed to run {}: {}", yolo_path, e)))?;
    if !status.success() {
        return Err(AppError::Training(format!("{} exited with {}", yolo_path, status)));
    }
    Ok(())
}

/// Trains the project's detector with the external Ultralytics command line tool.
///
/// A missing dataset descriptor is not an error: the caller is told to label first.
pub fn train(layout: &ProjectLayout, config: &TrainerConfig) -> AppResult<TrainingOutcome> {
    let dataset_config = layout.dataset_config();
    if !dataset_config.is_file() {
        return Ok(TrainingOutcome::MissingDatasetConfig(dataset_config));
    }
    info!("Dataset: {}", dataset_config.display());
    let images = count_dataset_images(&layout.dataset_dir());
    if images == 0 {
        warn!("No images found under {}", layout.dataset_dir().join("images").display());
    } else {
        info!("{} labeled images", images);
    }

    info!(
        "Training {} detector from {} ({} epochs, imgsz={})...",
        layout.run_name, config.base_model, config.epochs, config.image_size
    );
    run_yolo(&train_arguments(layout, config))?;
    let weights = layout.best_weights();
    if !weights.is_file() {
        return Err(AppError::Training(format!(
            "training finished but {} was not written",
            weights.display()
        )));
    }
    info!("Done. Best weights: {}", weights.display());

    let onnx = if config.export_onnx {
        run_yolo(&export_arguments(&weights, config))?;
        let onnx = layout.default_model();
        info!("Exported ONNX model: {}", onnx.display());
        Some(onnx)
    } else {
        None
    };
    Ok(TrainingOutcome::Trained { weights, onnx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_dataset_config_skips_training() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path(), "wheel");
        let outcome = train(&layout, &TrainerConfig::default()).unwrap();
        assert_eq!(outcome, TrainingOutcome::MissingDatasetConfig(layout.dataset_config()));
    }

    #[test]
    fn train_arguments_follow_the_layout() {
        let layout = ProjectLayout::new("/project", "wheel");
        let arguments: Vec<String> = train_arguments(&layout, &TrainerConfig::default())
            .into_iter()
            .map(|argument| argument.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            arguments,
            vec![
                "detect",
                "train",
                "data=/project/dataset/wheel/data.yaml",
                "model=yolov8n.pt",
                "epochs=35",
                "imgsz=640",
                "batch=8",
                "project=/project/runs/detect",
                "name=wheel",
                "exist_ok=True",
            ]
        );
    }

    #[test]
    fn export_arguments_target_onnx() {
        let arguments = export_arguments(Path::new("/w/best.pt"), &TrainerConfig::default());
        assert_eq!(arguments[1], OsString::from("model=/w/best.pt"));
        assert_eq!(arguments[2], OsString::from("format=onnx"));
    }

    #[test]
    fn counts_only_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/wheel_0000.jpg"), b"").unwrap();
        fs::write(dir.path().join("images/wheel_0001.JPG"), b"").unwrap();
        fs::write(dir.path().join("images/notes.txt"), b"").unwrap();
        assert_eq!(count_dataset_images(dir.path()), 2);
        assert_eq!(count_dataset_images(&dir.path().join("absent")), 0);
    }
}
