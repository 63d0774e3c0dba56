/// A struct representing a bounding box.
///
/// A bounding box is a rectangle used to annotate objects in images for training deep object
/// detection models. An ideal bounding box is the smallest box that totally contains the
/// object within the image. Bounding boxes are composed of a rectangle and a category denoting
/// what object it is. When an object detection model runs, it will output bounding boxes as its
/// output along with a probability encoding its confidence in that box+category.
///
/// This project uses the standard convention of the left side of the image being x=0 and the top
/// of the image being y=0.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    category: String,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        category: String,
    ) -> Result<Self, String> {
        if left > right {
            Err(format!(
                "Failed to create BoundingBox, value for left > value for right ({} > {}).",
                left, right
            ))
        } else if top > bottom {
            Err(format!(
                "Failed to create BoundingBox, value for top > value for bottom ({} > {}).",
                top, bottom
            ))
        } else {
            Ok(BoundingBox { left, top, right, bottom, category })
        }
    }

    /// Builds a box from YOLO's center-based output.
    pub fn from_center(
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
        category: String,
    ) -> Result<Self, String> {
        BoundingBox::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            center_x + width / 2.0,
            center_y + height / 2.0,
            category,
        )
    }

    /// Multiplies every coordinate by `factor`, then clips the box to an image
    /// of `image_width` x `image_height`.
    pub fn rescaled_and_clipped(&self, factor: f32, image_width: f32, image_height: f32) -> Self {
        BoundingBox {
            left: (self.left * factor).clamp(0.0, image_width),
            top: (self.top * factor).clamp(0.0, image_height),
            right: (self.right * factor).clamp(0.0, image_width),
            bottom: (self.bottom * factor).clamp(0.0, image_height),
            category: self.category.clone(),
        }
    }
}

pub trait BoundingBoxGeometry {
    fn left(&self) -> f32;
    fn top(&self) -> f32;
    fn right(&self) -> f32;
    fn bottom(&self) -> f32;
    fn category(&self) -> &str;

    fn width(&self) -> f32 {
        self.right() - self.left()
    }

    fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    fn area(&self) -> f32 {
        self.width() * self.height()
    }

    fn intersection_over_union(&self, other: &Self) -> f32
    where
        Self: Sized,
    {
        let intersection_width = self.right().min(other.right()) - self.left().max(other.left());
        let intersection_height = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if intersection_width <= 0.0 || intersection_height <= 0.0 {
            return 0.0;
        }
        let intersection = intersection_width * intersection_height;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 { 0.0 } else { intersection / union }
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f32 {
        self.left
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn right(&self) -> f32 {
        self.right
    }

    fn bottom(&self) -> f32 {
        self.bottom
    }

    fn category(&self) -> &str {
        &self.category
    }
}
