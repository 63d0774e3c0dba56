use crate::config::{CLASS_INDEX, MAX_NORMALIZED_SIZE, MIN_NORMALIZED_SIZE};
use imageproc::rect::Rect;
use std::fmt;

/// One line of a YOLO label file.
///
/// YOLO labels are center-based and normalized: every value is a fraction of the image
/// width or height, so a label stays valid when the image is resized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloLabel {
    pub class_index: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloLabel {
    /// Normalizes a pixel rectangle by the dimensions of the frame it was found in.
    pub fn from_pixel_rect(rect: &Rect, image_width: u32, image_height: u32) -> Self {
        let image_width = image_width as f64;
        let image_height = image_height as f64;
        let width = rect.width() as f64;
        let height = rect.height() as f64;
        YoloLabel {
            class_index: CLASS_INDEX,
            center_x: (rect.left() as f64 + width / 2.0) / image_width,
            center_y: (rect.top() as f64 + height / 2.0) / image_height,
            width: width / image_width,
            height: height / image_height,
        }
    }

    /// True when both the width and the height lie strictly between the noise-sized and
    /// the whole-frame limits.
    pub fn has_plausible_size(&self) -> bool {
        let in_range = |value: f64| value > MIN_NORMALIZED_SIZE && value < MAX_NORMALIZED_SIZE;
        in_range(self.width) && in_range(self.height)
    }
}

impl fmt::Display for YoloLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_index, self.center_x, self.center_y, self.width, self.height
        )
    }
}
