use crate::config::CLASS_INDEX;
use crate::error::AppResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DATASET_CONFIG_FILE: &str = "data.yaml";

/// Renders the Ultralytics dataset descriptor for a single-class dataset.
pub fn render_dataset_config(dataset_dir: &Path, class_name: &str) -> String {
    format!(
        "path: {}\ntrain: images\nval: images\nnames:\n  {}: {}\n",
        dataset_dir.display(),
        CLASS_INDEX,
        class_name
    )
}

/// Writes `data.yaml` into the dataset directory unless one already exists.
/// Returns the path of the descriptor.
pub fn ensure_dataset_config(dataset_dir: &Path, class_name: &str) -> AppResult<PathBuf> {
    let path = dataset_dir.join(DATASET_CONFIG_FILE);
    if path.exists() {
        return Ok(path);
    }
    fs::create_dir_all(dataset_dir)?;
    let absolute = fs::canonicalize(dataset_dir)?;
    fs::write(&path, render_dataset_config(&absolute, class_name))?;
    info!("Wrote dataset config {}", path.display());
    Ok(path)
}
