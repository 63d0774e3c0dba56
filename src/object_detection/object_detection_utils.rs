use crate::annotations::bounding_box::BoundingBoxGeometry;
use crate::annotations::detection::Detection;
use itertools::Itertools;

/// Non maxmimum suppression is a way of removing duplicate detections.
///
/// The result is ordered by descending confidence.
pub fn non_maximum_suppression<T: BoundingBoxGeometry>(
    mut detections: Vec<Detection<T>>,
    iou_threshold: f32,
) -> Vec<Detection<T>> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut detections_to_remove: Vec<bool> = vec![false; detections.len()];
    for (current_index, current_det) in detections.iter().enumerate() {
        if detections_to_remove[current_index] {
            continue;
        }
        for (other_index, other_det) in detections[current_index + 1..].iter().enumerate() {
            if detections_to_remove[current_index + other_index + 1] {
                continue;
            }
            if current_det.annotation.category() != other_det.annotation.category() {
                continue;
            }
            let iou = current_det
                .annotation
                .intersection_over_union(&other_det.annotation);
            if iou > iou_threshold {
                detections_to_remove[current_index + other_index + 1] = true;
            }
        }
    }
    let mut drop_iter = detections_to_remove.into_iter();
    detections.retain(|_| !drop_iter.next().unwrap_or(false));
    detections
}

/// Keeps the `max_detections` most confident detections, most confident first.
pub fn top_detections<T: BoundingBoxGeometry>(
    detections: Vec<Detection<T>>,
    max_detections: usize,
) -> Vec<Detection<T>> {
    detections
        .into_iter()
        .sorted_by(|a, b| b.confidence.total_cmp(&a.confidence))
        .take(max_detections)
        .collect()
}
