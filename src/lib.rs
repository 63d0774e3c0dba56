//! Single-class dataset tooling: auto-label a video with background
//! subtraction, train a YOLO detector on the result, and run it on images.

pub mod annotations;
pub mod background;
pub mod config;
pub mod error;
pub mod image_utils;
pub mod labeling;
pub mod logging;
pub mod object_detection;
pub mod training;
pub mod video;

pub use error::{AppError, AppResult};
