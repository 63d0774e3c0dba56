use crate::error::AppResult;
use image::codecs::jpeg::JpegEncoder;
use image::{self, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JPEG quality used for dataset images.
pub const JPEG_QUALITY: u8 = 95;

pub fn read_image_as_rgb8(filepath: &Path) -> AppResult<RgbImage> {
    Ok(image::open(filepath)?.into_rgb8())
}

pub fn save_rgb8_as_jpeg(image: &RgbImage, filepath: &Path) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(filepath)?);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(image)?;
    writer.flush()?;
    Ok(())
}
