use crate::annotations::bounding_box::BoundingBoxGeometry;
use crate::annotations::detection::Detection;
use crate::error::AppResult;
use ndarray::ArrayView4;

/// Defines a trait that all object detection models must follow.
pub trait ObjectDetectionModel<T: BoundingBoxGeometry> {
    /// run_inference does not take an array directly, but rather a view into an array
    /// with dimensions (1, 3, input_height, input_width) holding values in [0, 1].
    ///
    /// Returned boxes are in the coordinates of that input, before any undoing of
    /// resizing or padding, and before non maximum suppression.
    fn run_inference(
        &mut self,
        input_array: ArrayView4<f32>,
        confidence: f32,
    ) -> AppResult<Vec<Detection<T>>>;
}
