use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Class index written into every label file. Each dataset directory holds
/// exactly one class.
pub const CLASS_INDEX: u32 = 0;

pub const DEFAULT_SECONDS_PER_SAMPLE: u32 = 1;
pub const DEFAULT_MIN_OBJECT_AREA: u32 = 1000;

/// Normalized box width and height must lie strictly inside this interval.
pub const MIN_NORMALIZED_SIZE: f64 = 0.05;
pub const MAX_NORMALIZED_SIZE: f64 = 0.95;

pub const DEFAULT_CONFIDENCE: f32 = 0.08;
pub const MIN_CONFIDENCE: f32 = 0.01;
pub const MAX_CONFIDENCE: f32 = 0.99;
pub const DEFAULT_MAX_DETECTIONS: usize = 5;
pub const DEFAULT_NMS_IOU_THRESHOLD: f32 = 0.7;
pub const DEFAULT_MODEL_INPUT_SIZE: u32 = 640;

pub const DEFAULT_RUN_NAME: &str = "wheel";

/// File name of an optional JSON project config placed in the project root.
pub const PROJECT_CONFIG_FILE: &str = "autolabel.json";

/// Settings of the adaptive background model.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Number of frames that make up the model's memory.
    pub history: u32,
    /// Squared Mahalanobis distance under which a pixel is explained by a
    /// background mode.
    pub var_threshold: f32,
    pub detect_shadows: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig { history: 500, var_threshold: 16.0, detect_shadows: true }
    }
}

/// Everything one labeling run needs.
#[derive(Clone, Debug)]
pub struct LabelerConfig {
    pub video: PathBuf,
    pub class_name: String,
    pub output_dir: PathBuf,
    pub seconds_per_sample: u32,
    pub min_object_area: u32,
    /// `None` resolves the index from the files already in the dataset.
    pub start_index: Option<u32>,
    pub background: BackgroundConfig,
}

impl LabelerConfig {
    pub fn new(video: PathBuf, class_name: String, output_dir: PathBuf) -> Self {
        LabelerConfig {
            video,
            class_name,
            output_dir,
            seconds_per_sample: DEFAULT_SECONDS_PER_SAMPLE,
            min_object_area: DEFAULT_MIN_OBJECT_AREA,
            start_index: None,
            background: BackgroundConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Pretrained weights the external trainer starts from.
    pub base_model: String,
    pub epochs: u32,
    pub image_size: u32,
    pub batch: u32,
    /// Export `best.pt` to ONNX once training finishes.
    pub export_onnx: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            base_model: "yolov8n.pt".to_string(),
            epochs: 35,
            image_size: DEFAULT_MODEL_INPUT_SIZE,
            batch: 8,
            export_onnx: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub confidence: f32,
    pub max_detections: usize,
    pub iou_threshold: f32,
    pub input_size: u32,
    /// Label attached to every detection record.
    pub label: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            confidence: DEFAULT_CONFIDENCE,
            max_detections: DEFAULT_MAX_DETECTIONS,
            iou_threshold: DEFAULT_NMS_IOU_THRESHOLD,
            input_size: DEFAULT_MODEL_INPUT_SIZE,
            label: DEFAULT_RUN_NAME.to_string(),
        }
    }
}

/// Clamps a requested confidence into the range the detector accepts.
/// Non-finite values fall back to the default.
pub fn clamp_confidence(confidence: f32) -> f32 {
    if !confidence.is_finite() {
        return DEFAULT_CONFIDENCE;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Optional JSON file overriding trainer and detector settings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub run_name: Option<String>,
    pub trainer: TrainerConfig,
    pub detector: DetectorConfig,
}

impl ProjectConfig {
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Reads `explicit` when given, otherwise `autolabel.json` in the project
    /// root if it exists, otherwise the defaults.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = project_root.join(PROJECT_CONFIG_FILE);
                if path.is_file() { Self::from_file(&path) } else { Ok(Self::default()) }
            }
        }
    }
}

/// Fixed, project-relative locations shared by the trainer and the detector.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub run_name: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, run_name: impl Into<String>) -> Self {
        ProjectLayout { root: root.into(), run_name: run_name.into() }
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join("dataset").join(&self.run_name)
    }

    pub fn dataset_config(&self) -> PathBuf {
        self.dataset_dir().join("data.yaml")
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.root.join("runs").join("detect")
    }

    pub fn weights_dir(&self) -> PathBuf {
        self.runs_dir().join(&self.run_name).join("weights")
    }

    pub fn best_weights(&self) -> PathBuf {
        self.weights_dir().join("best.pt")
    }

    /// The ONNX export of `best.pt`, which is what the detector runner loads.
    pub fn default_model(&self) -> PathBuf {
        self.weights_dir().join("best.onnx")
    }
}
