pub mod detection_record;
pub mod detector_runner;
pub mod object_detection_model;
pub mod object_detection_utils;
pub mod ort_inference_session;
pub mod yolo_bounding_box;
