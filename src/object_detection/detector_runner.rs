use crate::config::{DetectorConfig, clamp_confidence};
use crate::error::{AppError, AppResult};
use crate::image_utils::image_io::read_image_as_rgb8;
use crate::object_detection::detection_record::DetectionRecord;
use crate::object_detection::object_detection_utils::top_detections;
use crate::object_detection::yolo_bounding_box::YoloBoundingBox;
use std::path::Path;
use tracing::debug;

/// Fails with `NotFound` for whichever input is missing, image first.
pub fn check_inputs(image_path: &Path, model_path: &Path) -> AppResult<()> {
    for path in [image_path, model_path] {
        if !path.is_file() {
            return Err(AppError::NotFound(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Runs the model on one image and returns at most `max_detections` records, most
/// confident first. The confidence threshold is clamped to the accepted range.
pub fn detect_image(
    image_path: &Path,
    model_path: &Path,
    config: &DetectorConfig,
) -> AppResult<Vec<DetectionRecord>> {
    check_inputs(image_path, model_path)?;
    let confidence = clamp_confidence(config.confidence);
    let image = read_image_as_rgb8(image_path)?;
    let mut model =
        YoloBoundingBox::new(model_path, vec![config.label.clone()], config.input_size)?;
    debug!("Loaded {} (input {}px)", model_path.display(), config.input_size);

    let detections = model.detect(&image, confidence, config.iou_threshold)?;
    Ok(top_detections(detections, config.max_detections)
        .iter()
        .map(DetectionRecord::from)
        .collect())
}
