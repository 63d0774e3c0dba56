use crate::error::{AppError, AppResult};
use image::{GrayImage, RgbImage};
use ndarray::Array4;
use opencv::core::{CV_8UC1, Mat};
use opencv::prelude::*;

/// Converts an image into the `(batch, channel, row, column)` layout YOLO models take,
/// scaling every channel into [0, 1].
pub fn convert_rgb_image_to_owned_array(rgb_image: &RgbImage) -> Array4<f32> {
    let mut image_array = Array4::zeros((
        1,
        3,
        rgb_image.height() as usize,
        rgb_image.width() as usize,
    ));
    for (x, y, pixel) in rgb_image.enumerate_pixels() {
        let x = x as usize;
        let y = y as usize;
        let [r, g, b] = pixel.0;
        image_array[[0, 0, y, x]] = (r as f32) / 255.;
        image_array[[0, 1, y, x]] = (g as f32) / 255.;
        image_array[[0, 2, y, x]] = (b as f32) / 255.;
    }
    image_array
}

/// Copies an RGB image into a three-channel 8-bit `Mat`, channel order unchanged.
pub fn convert_rgb_image_to_mat(rgb_image: &RgbImage) -> AppResult<Mat> {
    let flat = Mat::from_slice(rgb_image.as_raw())?;
    Ok(flat.reshape(3, rgb_image.height() as i32)?.try_clone()?)
}

/// Copies a grayscale image into a single-channel 8-bit `Mat`.
pub fn convert_gray_image_to_mat(gray_image: &GrayImage) -> AppResult<Mat> {
    let flat = Mat::from_slice(gray_image.as_raw())?;
    Ok(flat.reshape(1, gray_image.height() as i32)?.try_clone()?)
}

pub fn convert_mat_to_gray_image(mat: &Mat) -> AppResult<GrayImage> {
    if mat.typ() != CV_8UC1 {
        return Err(AppError::InvalidArgument(format!(
            "expected a single-channel 8-bit mask, got Mat type {}",
            mat.typ()
        )));
    }
    // A clone is always continuous.
    let owned = mat.try_clone()?;
    let bytes = owned.data_bytes()?.to_vec();
    GrayImage::from_raw(owned.cols() as u32, owned.rows() as u32, bytes).ok_or_else(|| {
        AppError::InvalidArgument("mask data does not match its dimensions".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn convert_rgb_image_to_owned_array_test() {
        let mut rgb_img = RgbImage::new(3, 2);
        rgb_img.put_pixel(2, 0, Rgb([255, 0, 0]));
        rgb_img.put_pixel(0, 1, Rgb([0, 255, 51]));

        let arr4_img = convert_rgb_image_to_owned_array(&rgb_img);
        // The dimensions encode (image, channel, row, column).
        assert_eq!(arr4_img.shape(), &[1, 3, 2, 3]);
        assert_eq!(
            (arr4_img[[0, 0, 0, 2]], arr4_img[[0, 1, 0, 2]], arr4_img[[0, 2, 0, 2]]),
            (1.0, 0.0, 0.0)
        );
        assert_eq!(
            (arr4_img[[0, 0, 1, 0]], arr4_img[[0, 1, 1, 0]], arr4_img[[0, 2, 1, 0]]),
            (0.0, 1.0, 0.2)
        );
        assert_eq!(arr4_img[[0, 0, 1, 1]], 0.0);
    }

    #[test]
    fn rgb_image_keeps_its_layout_as_mat() {
        let mut rgb_img = RgbImage::new(4, 2);
        rgb_img.put_pixel(3, 1, Rgb([10, 20, 30]));
        let mat = convert_rgb_image_to_mat(&rgb_img).unwrap();
        assert_eq!((mat.cols(), mat.rows(), mat.channels()), (4, 2, 3));
        let pixel = *mat.at_2d::<opencv::core::Vec3b>(1, 3).unwrap();
        assert_eq!(pixel.0, [10, 20, 30]);
    }

    #[test]
    fn gray_image_round_trips_through_mat() {
        let mut gray = GrayImage::new(5, 3);
        gray.put_pixel(4, 2, Luma([255]));
        gray.put_pixel(0, 1, Luma([127]));
        let mat = convert_gray_image_to_mat(&gray).unwrap();
        assert_eq!(convert_mat_to_gray_image(&mat).unwrap(), gray);
    }

    #[test]
    fn color_mat_is_not_a_mask() {
        let mat = convert_rgb_image_to_mat(&RgbImage::new(2, 2)).unwrap();
        assert!(matches!(convert_mat_to_gray_image(&mat), Err(AppError::InvalidArgument(_))));
    }
}
