use crate::error::{AppError, AppResult};
use ort::session::Session;
use std::path::Path;
use tracing::debug;

pub const MODEL_INPUT_NAME: &str = "images";
pub const MODEL_OUTPUT_NAME: &str = "output0";

/// An onnxruntime session over a YOLO export.
///
/// Loading fails early when the graph lacks the `images` input or the `output0` output,
/// so a wrong model file is reported before any image is processed.
pub struct OrtInferenceSession {
    pub session: Session,
}

impl OrtInferenceSession {
    pub fn new(model_path: &Path) -> AppResult<Self> {
        let session = Session::builder()?.commit_from_file(model_path)?;
        let has_input = session.inputs.iter().any(|input| input.name == MODEL_INPUT_NAME);
        let has_output = session.outputs.iter().any(|output| output.name == MODEL_OUTPUT_NAME);
        if !has_input || !has_output {
            return Err(AppError::Inference(format!(
                "{} is not a YOLO detection export (needs input {:?} and output {:?})",
                model_path.display(),
                MODEL_INPUT_NAME,
                MODEL_OUTPUT_NAME
            )));
        }
        debug!(
            "Session for {} with {} input(s), {} output(s)",
            model_path.display(),
            session.inputs.len(),
            session.outputs.len()
        );
        Ok(Self { session })
    }
}
