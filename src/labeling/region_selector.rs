use crate::annotations::yolo_label::YoloLabel;
use crate::error::AppResult;
use crate::image_utils::image_conversion::convert_gray_image_to_mat;
use image::GrayImage;
use imageproc::rect::Rect;
use opencv::core::{Point, Vector};
use opencv::imgproc::{self, CHAIN_APPROX_SIMPLE, RETR_EXTERNAL};

/// What the selector decided for one sampled frame.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionDecision {
    /// The largest region passed every check.
    Accepted { rect: Rect, area: f64, label: YoloLabel },
    /// The mask contains no foreground region.
    NoObject,
    /// The largest region is smaller than the minimum area and is treated as noise.
    TooSmall { area: f64 },
    /// The box is either noise-sized or spans nearly the whole frame.
    InvalidBox { rect: Rect, label: YoloLabel },
}

/// Picks the object in a cleaned binary mask.
///
/// Only outer borders are traced, holes are part of their region, and regions touching
/// the frame edge count like any other. The region with the largest enclosed area wins
/// (the first one on ties), its bounding rectangle is normalized by the mask size and
/// checked against the plausible size limits.
pub fn select_region(mask: &GrayImage, min_area: f64) -> AppResult<RegionDecision> {
    let input = convert_gray_image_to_mat(mask)?;
    let mut contours = Vector::<Vector<Point>>::new();
    imgproc::find_contours(
        &input,
        &mut contours,
        RETR_EXTERNAL,
        CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;

    let mut largest: Option<(Vector<Point>, f64)> = None;
    for contour in contours.iter() {
        let area = imgproc::contour_area(&contour, false)?;
        if largest.as_ref().is_none_or(|(_, best)| area > *best) {
            largest = Some((contour, area));
        }
    }

    let Some((contour, area)) = largest else {
        return Ok(RegionDecision::NoObject);
    };
    if area < min_area {
        return Ok(RegionDecision::TooSmall { area });
    }
    let bounds = imgproc::bounding_rect(&contour)?;
    let rect = Rect::at(bounds.x, bounds.y).of_size(bounds.width as u32, bounds.height as u32);

    let label = YoloLabel::from_pixel_rect(&rect, mask.width(), mask.height());
    if !label.has_plausible_size() {
        return Ok(RegionDecision::InvalidBox { rect, label });
    }
    Ok(RegionDecision::Accepted { rect, area, label })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn mask_with(width: u32, height: u32, boxes: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for &(x0, y0, w, h) in boxes {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }

    fn accepted_rect(mask: &GrayImage, min_area: f64) -> Rect {
        match select_region(mask, min_area).unwrap() {
            RegionDecision::Accepted { rect, .. } => rect,
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn empty_mask_has_no_object() {
        let mask = GrayImage::new(100, 100);
        assert_eq!(select_region(&mask, 10.0).unwrap(), RegionDecision::NoObject);
    }

    #[test]
    fn largest_region_wins() {
        let mask = mask_with(400, 400, &[(10, 10, 30, 30), (200, 100, 80, 120)]);
        match select_region(&mask, 100.0).unwrap() {
            RegionDecision::Accepted { rect, area, label } => {
                assert_eq!(rect, Rect::at(200, 100).of_size(80, 120));
                assert_eq!(area, 79.0 * 119.0);
                assert!((label.center_x - 0.6).abs() < 1e-9);
                assert!((label.center_y - 0.4).abs() < 1e-9);
                assert!((label.width - 0.2).abs() < 1e-9);
                assert!((label.height - 0.3).abs() < 1e-9);
            }
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn holes_do_not_split_a_region() {
        let mut mask = mask_with(200, 200, &[(50, 50, 60, 60)]);
        for y in 70..90 {
            for x in 70..90 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        assert_eq!(accepted_rect(&mask, 100.0), Rect::at(50, 50).of_size(60, 60));
    }

    #[test]
    fn regions_on_each_frame_edge_are_found() {
        let cases = [
            ((0, 170, 40, 60), Rect::at(0, 170).of_size(40, 60)),
            ((180, 0, 40, 60), Rect::at(180, 0).of_size(40, 60)),
            ((360, 170, 40, 60), Rect::at(360, 170).of_size(40, 60)),
            ((180, 340, 40, 60), Rect::at(180, 340).of_size(40, 60)),
        ];
        for (block, expected) in cases {
            let mask = mask_with(400, 400, &[block]);
            assert_eq!(accepted_rect(&mask, 1000.0), expected, "block {:?}", block);
        }
    }

    #[test]
    fn largest_region_on_the_left_edge_beats_a_smaller_interior_one() {
        let mask = mask_with(400, 400, &[(0, 100, 150, 200), (250, 50, 40, 40)]);
        assert_eq!(accepted_rect(&mask, 1000.0), Rect::at(0, 100).of_size(150, 200));
    }

    #[test]
    fn small_region_is_noise() {
        let mask = mask_with(400, 400, &[(10, 10, 20, 20)]);
        assert_eq!(
            select_region(&mask, 1000.0).unwrap(),
            RegionDecision::TooSmall { area: 19.0 * 19.0 }
        );
    }

    #[test]
    fn forty_pixels_in_four_hundred_is_accepted() {
        let mask = mask_with(400, 400, &[(100, 100, 40, 200)]);
        match select_region(&mask, 1000.0).unwrap() {
            RegionDecision::Accepted { label, .. } => assert!((label.width - 0.1).abs() < 1e-9),
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn ten_pixels_in_four_hundred_is_rejected() {
        let mask = mask_with(400, 400, &[(100, 100, 10, 200)]);
        match select_region(&mask, 1000.0).unwrap() {
            RegionDecision::InvalidBox { label, .. } => {
                assert!((label.width - 0.025).abs() < 1e-9)
            }
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn frame_spanning_region_is_rejected() {
        let mask = mask_with(100, 100, &[(1, 1, 98, 50)]);
        assert!(matches!(select_region(&mask, 100.0).unwrap(), RegionDecision::InvalidBox { .. }));
    }
}
