use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::Detection;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};

/// One entry of the detector runner's JSON output.
///
/// `bbox` is `[left, top, width, height]` in whole pixels of the original image.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub label: String,
    pub confidence: f32,
    pub bbox: [i64; 4],
}

impl From<&Detection<BoundingBox>> for DetectionRecord {
    fn from(detection: &Detection<BoundingBox>) -> Self {
        let bbox = &detection.annotation;
        let round = |value: f32| value.round_ties_even() as i64;
        DetectionRecord {
            label: bbox.category().to_string(),
            confidence: detection.confidence,
            bbox: [
                round(bbox.left()),
                round(bbox.top()),
                round(bbox.width()),
                round(bbox.height()),
            ],
        }
    }
}

pub fn records_to_json(records: &[DetectionRecord]) -> AppResult<String> {
    Ok(serde_json::to_string(records)?)
}
