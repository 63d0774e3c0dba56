use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Gray value YOLO models are trained to see in padded areas.
pub const LETTERBOX_FILL: Rgb<u8> = Rgb([114, 114, 114]);

/// An image resized into a square model input, padding on the right and bottom.
pub struct Letterbox {
    pub image: RgbImage,
    /// Factor from original pixels to letterboxed pixels.
    pub scale: f32,
}

/// Resizes an rgb8 image to fit `size` x `size` while keeping its aspect ratio, then pads
/// it by adding pixels to the right and bottom of the image.
pub fn letterbox_rgb8(original_image: &RgbImage, size: u32) -> Letterbox {
    let (width, height) = original_image.dimensions();
    let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
    let new_width = ((width as f32 * scale).round() as u32).clamp(1, size);
    let new_height = ((height as f32 * scale).round() as u32).clamp(1, size);

    let mut padded_image = RgbImage::from_pixel(size, size, LETTERBOX_FILL);
    if (new_width, new_height) == (width, height) {
        imageops::replace(&mut padded_image, original_image, 0, 0);
    } else {
        let resized = imageops::resize(original_image, new_width, new_height, FilterType::Triangle);
        imageops::replace(&mut padded_image, &resized, 0, 0);
    }
    Letterbox { image: padded_image, scale }
}
