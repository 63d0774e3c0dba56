use crate::error::{AppError, AppResult};
use regex::RegexBuilder;
use std::path::Path;
use walkdir::WalkDir;

/// Returns the index the next image of `class_name` should use in `images_dir`.
///
/// Existing `<class_name>_<digits>.jpg` files (case-insensitive) are scanned and the
/// largest index plus one is returned, so several videos can append to one dataset.
/// Gaps in the numbering are never filled. A missing directory, or one without
/// matching files, gives 0.
pub fn next_dataset_index(images_dir: &Path, class_name: &str) -> AppResult<u32> {
    if !images_dir.is_dir() {
        return Ok(0);
    }
    let pattern = RegexBuilder::new(&format!(r"^{}_(\d+)\.jpg$", regex::escape(class_name)))
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let mut next = 0;
    for entry in WalkDir::new(images_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        let index = pattern
            .captures(&file_name)
            .and_then(|captures| captures[1].parse::<u32>().ok());
        if let Some(index) = index {
            next = next.max(index.saturating_add(1));
        }
    }
    Ok(next)
}
