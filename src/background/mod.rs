pub mod mask_cleanup;
pub mod mog2;

use crate::error::AppResult;
use image::{GrayImage, RgbImage};

/// Mask value of pixels explained by the background model.
pub const BACKGROUND: u8 = 0;
/// Mask value of pixels classified as a shadow cast on the background.
pub const SHADOW: u8 = 127;
/// Mask value of moving or changed pixels.
pub const FOREGROUND: u8 = 255;

/// An adaptive model of a static scene.
///
/// `apply` must be called on every decoded frame, sampled or not, so the model keeps
/// adapting to lighting changes. It returns a mask of the same size as the frame holding
/// `BACKGROUND`, `SHADOW` or `FOREGROUND` per pixel.
pub trait BackgroundModel {
    fn apply(&mut self, frame: &RgbImage) -> AppResult<GrayImage>;
}
