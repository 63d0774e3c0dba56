use crate::background::BackgroundModel;
use crate::config::BackgroundConfig;
use crate::error::AppResult;
use crate::image_utils::image_conversion::{convert_mat_to_gray_image, convert_rgb_image_to_mat};
use image::{GrayImage, RgbImage};
use opencv::core::{Mat, Ptr};
use opencv::video::{self, BackgroundSubtractorMOG2, BackgroundSubtractorMOG2Trait};
use tracing::debug;

/// Lets OpenCV pick the rate, 1 / min(2 * frames, history).
const AUTOMATIC_LEARNING_RATE: f64 = -1.0;

/// OpenCV's Gaussian-mixture background subtractor (MOG2).
///
/// Masks hold 0 for background, 127 for shadows (when enabled) and 255 for foreground.
/// The model starts over whenever the frame size changes.
pub struct Mog2 {
    subtractor: Ptr<BackgroundSubtractorMOG2>,
    frame_size: Option<(u32, u32)>,
    frames_seen: u64,
}

impl Mog2 {
    pub fn new(config: BackgroundConfig) -> AppResult<Self> {
        let history = i32::try_from(config.history).unwrap_or(i32::MAX);
        let subtractor = video::create_background_subtractor_mog2(
            history,
            config.var_threshold as f64,
            config.detect_shadows,
        )?;
        Ok(Mog2 { subtractor, frame_size: None, frames_seen: 0 })
    }

    /// Frames applied since the model was last (re)initialized.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl BackgroundModel for Mog2 {
    fn apply(&mut self, frame: &RgbImage) -> AppResult<GrayImage> {
        let size = frame.dimensions();
        if self.frame_size != Some(size) {
            debug!("Initializing background model for {}x{} frames", size.0, size.1);
            self.frame_size = Some(size);
            self.frames_seen = 0;
        }
        self.frames_seen += 1;

        let input = convert_rgb_image_to_mat(frame)?;
        let mut mask = Mat::default();
        BackgroundSubtractorMOG2Trait::apply(
            &mut self.subtractor,
            &input,
            &mut mask,
            AUTOMATIC_LEARNING_RATE,
        )?;
        convert_mat_to_gray_image(&mask)
    }
}
