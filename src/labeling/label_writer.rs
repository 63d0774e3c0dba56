use crate::annotations::yolo_label::YoloLabel;
use crate::error::AppResult;
use crate::image_utils::image_io::save_rgb8_as_jpeg;
use crate::labeling::dataset_index::next_dataset_index;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes image/label pairs into a YOLO dataset directory.
///
/// Pairs are named `<class_name>_<NNNN>` and numbered consecutively from the start
/// index. The image is written before its label; nothing is rolled back if the label
/// write fails.
pub struct DatasetWriter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    class_name: String,
    first_index: u32,
    next_index: u32,
}

impl DatasetWriter {
    /// Creates `images/` and `labels/` under `output_dir` if needed. Without an explicit
    /// start index, numbering continues after the images already present.
    pub fn create(
        output_dir: &Path,
        class_name: &str,
        start_index: Option<u32>,
    ) -> AppResult<Self> {
        let images_dir = output_dir.join("images");
        let labels_dir = output_dir.join("labels");
        fs::create_dir_all(&images_dir)?;
        fs::create_dir_all(&labels_dir)?;
        let first_index = match start_index {
            Some(index) => index,
            None => next_dataset_index(&images_dir, class_name)?,
        };
        Ok(DatasetWriter {
            images_dir,
            labels_dir,
            class_name: class_name.to_string(),
            first_index,
            next_index: first_index,
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    /// Index the next saved pair will get; also the dataset size when numbering
    /// started at 0 and has no gaps.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Number of pairs written by this writer.
    pub fn saved(&self) -> u32 {
        self.next_index - self.first_index
    }

    /// Writes the frame and its label, returning the image file name.
    pub fn write(&mut self, frame: &RgbImage, label: &YoloLabel) -> AppResult<String> {
        let stem = format!("{}_{:04}", self.class_name, self.next_index);
        let image_name = format!("{}.jpg", stem);
        save_rgb8_as_jpeg(frame, &self.images_dir.join(&image_name))?;
        fs::write(self.labels_dir.join(format!("{}.txt", stem)), format!("{}\n", label))?;
        self.next_index += 1;
        Ok(image_name)
    }
}
