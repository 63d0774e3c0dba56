pub mod ffmpeg;
pub mod frame_sampler;

use crate::error::AppResult;
use image::RgbImage;

/// A sequential source of decoded video frames.
pub trait FrameSource {
    /// Frames per second as reported by the container.
    fn frame_rate(&self) -> f64;

    /// Returns the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> AppResult<Option<RgbImage>>;
}
