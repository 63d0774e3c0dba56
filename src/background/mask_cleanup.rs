use crate::background::{FOREGROUND, SHADOW};
use crate::error::AppResult;
use crate::image_utils::image_conversion::{convert_gray_image_to_mat, convert_mat_to_gray_image};
use image::GrayImage;
use opencv::core::{BORDER_CONSTANT, Mat, Point, Size};
use opencv::imgproc::{self, MORPH_CLOSE, MORPH_ELLIPSE, MORPH_OPEN, THRESH_BINARY};

const KERNEL_SIZE: i32 = 5;

fn morphology(mask: &Mat, operation: i32, kernel: &Mat) -> AppResult<Mat> {
    let mut result = Mat::default();
    imgproc::morphology_ex(
        mask,
        &mut result,
        operation,
        kernel,
        Point::new(-1, -1),
        1,
        BORDER_CONSTANT,
        imgproc::morphology_default_border_value()?,
    )?;
    Ok(result)
}

/// Turns a three-valued background model mask into a binary foreground mask.
///
/// Shadows are dropped first, then a closing fills small holes and gaps inside the
/// object and an opening removes isolated noise, both with a 5x5 ellipse. Closing
/// must come before opening.
pub fn clean_foreground_mask(mask: &GrayImage) -> AppResult<GrayImage> {
    let input = convert_gray_image_to_mat(mask)?;
    let mut binary = Mat::default();
    imgproc::threshold(&input, &mut binary, SHADOW as f64, FOREGROUND as f64, THRESH_BINARY)?;

    let kernel = imgproc::get_structuring_element(
        MORPH_ELLIPSE,
        Size::new(KERNEL_SIZE, KERNEL_SIZE),
        Point::new(-1, -1),
    )?;
    let closed = morphology(&binary, MORPH_CLOSE, &kernel)?;
    let opened = morphology(&closed, MORPH_OPEN, &kernel)?;
    convert_mat_to_gray_image(&opened)
}
