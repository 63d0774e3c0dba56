use std::path::PathBuf;
use thiserror::Error;

/// Errors produced anywhere in the labeling, training and detection tools.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] ort::Error),

    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("Could not open video {}: {reason}", path.display())]
    VideoOpen { path: PathBuf, reason: String },

    #[error(
        "Invalid sampling interval: frame rate {frame_rate} x {seconds_per_sample} second(s) \
        gives an interval of 0 frames"
    )]
    InvalidSamplingInterval { frame_rate: f64, seconds_per_sample: u32 },

    #[error("Training error: {0}")]
    Training(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type AppResult<T> = Result<T, AppError>;
