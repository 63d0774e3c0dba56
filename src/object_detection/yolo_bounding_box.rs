use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::error::{AppError, AppResult};
use crate::image_utils::image_conversion::convert_rgb_image_to_owned_array;
use crate::image_utils::padding::letterbox_rgb8;
use crate::object_detection::object_detection_model::ObjectDetectionModel;
use crate::object_detection::object_detection_utils::non_maximum_suppression;
use crate::object_detection::ort_inference_session::{
    MODEL_INPUT_NAME, MODEL_OUTPUT_NAME, OrtInferenceSession,
};
use image::RgbImage;
use ndarray::{ArrayView2, ArrayView4, Axis, Ix2};
use ort::inputs;
use ort::value::TensorRef;
use std::path::Path;
use tracing::debug;

/// A YOLO detection model exported to ONNX by Ultralytics.
///
/// The exported graph takes an `images` tensor of shape (1, 3, size, size) and returns
/// `output0` of shape (1, 4 + classes, anchors), where the first four rows of every
/// anchor hold the box center and size in input pixels and the remaining rows hold one
/// score per class.
pub struct YoloBoundingBox {
    ort_session: OrtInferenceSession,
    class_names: Vec<String>,
    input_size: u32,
}

impl YoloBoundingBox {
    pub fn new(model_path: &Path, class_names: Vec<String>, input_size: u32) -> AppResult<Self> {
        let ort_session = OrtInferenceSession::new(model_path)?;
        Ok(YoloBoundingBox { ort_session, class_names, input_size })
    }

    /// Detects objects in a whole image of any size.
    ///
    /// The image is letterboxed into the model input, and the resulting boxes are mapped
    /// back to original pixels, clipped to the image and deduplicated.
    pub fn detect(
        &mut self,
        image: &RgbImage,
        confidence: f32,
        iou_threshold: f32,
    ) -> AppResult<Vec<Detection<BoundingBox>>> {
        let letterbox = letterbox_rgb8(image, self.input_size);
        let input_array = convert_rgb_image_to_owned_array(&letterbox.image);
        let detections = self.run_inference(input_array.view(), confidence)?;
        debug!("{} raw detections above confidence {}", detections.len(), confidence);

        let (width, height) = image.dimensions();
        let restored = detections
            .into_iter()
            .map(|detection| {
                detection.map_annotation(|bbox| {
                    bbox.rescaled_and_clipped(1.0 / letterbox.scale, width as f32, height as f32)
                })
            })
            .collect();
        Ok(non_maximum_suppression(restored, iou_threshold))
    }
}

/// Turns the transposed model output, one row per anchor, into detections.
pub fn decode_predictions(
    predictions: ArrayView2<f32>,
    class_names: &[String],
    confidence: f32,
) -> Vec<Detection<BoundingBox>> {
    let mut detections: Vec<Detection<BoundingBox>> = Vec::new();
    for row in predictions.axis_iter(Axis(0)) {
        let row: Vec<_> = row.iter().copied().collect();
        let best_class = row
            .iter()
            .skip(4) // skips bounding box coords.
            .enumerate()
            .map(|(index, value)| (index, *value))
            .reduce(|accum, row| if row.1 > accum.1 { row } else { accum });
        let Some((class_id, prob)) = best_class else {
            continue;
        };
        if prob < confidence {
            continue;
        }
        let label = match class_names.get(class_id) {
            Some(v) => v.clone(),
            None => class_id.to_string(),
        };
        if let Ok(bbox) = BoundingBox::from_center(row[0], row[1], row[2], row[3], label) {
            detections.push(Detection { annotation: bbox, confidence: prob });
        }
    }
    detections
}

impl ObjectDetectionModel<BoundingBox> for YoloBoundingBox {
    fn run_inference(
        &mut self,
        input_array: ArrayView4<f32>,
        confidence: f32,
    ) -> AppResult<Vec<Detection<BoundingBox>>> {
        let outputs = self
            .ort_session
            .session
            .run(inputs![MODEL_INPUT_NAME => TensorRef::from_array_view(input_array)?])?;
        let output = outputs[MODEL_OUTPUT_NAME].try_extract_array::<f32>()?;
        if output.ndim() != 3 || output.shape()[0] != 1 {
            return Err(AppError::Inference(format!(
                "expected output0 of shape (1, 4 + classes, anchors), got {:?}",
                output.shape()
            )));
        }
        let output = output
            .index_axis(Axis(0), 0)
            .into_dimensionality::<Ix2>()
            .map_err(|e| AppError::Inference(e.to_string()))?;
        Ok(decode_predictions(output.t(), &self.class_names, confidence))
    }
}
