use crate::annotations::bounding_box::BoundingBoxGeometry;

/// A box the model proposed, with the class score that backed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection<T: BoundingBoxGeometry> {
    pub annotation: T,
    pub confidence: f32,
}

impl<T: BoundingBoxGeometry> Detection<T> {
    /// Keeps the confidence and transforms the box, e.g. from model input space back
    /// into image pixels.
    pub fn map_annotation<U, F>(self, f: F) -> Detection<U>
    where
        U: BoundingBoxGeometry,
        F: FnOnce(T) -> U,
    {
        Detection { annotation: f(self.annotation), confidence: self.confidence }
    }
}
