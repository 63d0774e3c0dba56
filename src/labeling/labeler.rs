use crate::background::BackgroundModel;
use crate::background::mask_cleanup::clean_foreground_mask;
use crate::background::mog2::Mog2;
use crate::config::LabelerConfig;
use crate::error::AppResult;
use crate::labeling::dataset_config::ensure_dataset_config;
use crate::labeling::label_writer::DatasetWriter;
use crate::labeling::region_selector::{RegionDecision, select_region};
use crate::video::FrameSource;
use crate::video::ffmpeg::FfmpegFrameSource;
use crate::video::frame_sampler::FrameSampler;
use tracing::info;

/// Counters for one labeling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelingSummary {
    pub frames_read: u64,
    pub frames_sampled: u64,
    pub saved: u32,
    pub skipped_no_object: u32,
    pub skipped_too_small: u32,
    pub skipped_invalid_box: u32,
    /// Index the next run will continue from.
    pub next_index: u32,
}

/// Runs every frame of `source` through the background model and labels the sampled ones.
///
/// The background model sees every frame so it keeps adapting between samples; only
/// sampled frames go on to mask cleanup, region selection and writing.
pub fn label_frames<S: FrameSource, B: BackgroundModel>(
    source: &mut S,
    background: &mut B,
    sampler: &FrameSampler,
    writer: &mut DatasetWriter,
    min_area: f64,
) -> AppResult<LabelingSummary> {
    let mut summary = LabelingSummary::default();

    while let Some(frame) = source.next_frame()? {
        summary.frames_read += 1;
        let frame_count = summary.frames_read;
        let mask = background.apply(&frame)?;
        if !sampler.is_sampled(frame_count) {
            continue;
        }
        summary.frames_sampled += 1;

        let cleaned = clean_foreground_mask(&mask)?;
        match select_region(&cleaned, min_area)? {
            RegionDecision::NoObject => {
                summary.skipped_no_object += 1;
                info!("  Frame {}: No object detected (skip)", frame_count);
            }
            RegionDecision::TooSmall { area } => {
                summary.skipped_too_small += 1;
                info!("  Frame {}: Object too small (area={}, skip)", frame_count, area);
            }
            RegionDecision::InvalidBox { rect, label } => {
                summary.skipped_invalid_box += 1;
                info!(
                    "  Frame {}: Box size invalid (bbox: {},{},{},{}, normalized {:.3}x{:.3}, skip)",
                    frame_count,
                    rect.left(),
                    rect.top(),
                    rect.width(),
                    rect.height(),
                    label.width,
                    label.height
                );
            }
            RegionDecision::Accepted { rect, label, .. } => {
                let image_name = writer.write(&frame, &label)?;
                summary.saved += 1;
                info!(
                    "  Frame {}: Saved {} (bbox: {},{},{},{})",
                    frame_count,
                    image_name,
                    rect.left(),
                    rect.top(),
                    rect.width(),
                    rect.height()
                );
            }
        }
    }

    summary.next_index = writer.next_index();
    Ok(summary)
}

/// Labels one video end to end.
///
/// The video is opened and its frame rate validated before anything is written, so an
/// unreadable video leaves the output directory untouched.
pub fn run_labeler(config: &LabelerConfig) -> AppResult<LabelingSummary> {
    let mut source = FfmpegFrameSource::open(&config.video)?;
    let sampler = FrameSampler::new(source.frame_rate(), config.seconds_per_sample)?;

    let mut writer =
        DatasetWriter::create(&config.output_dir, &config.class_name, config.start_index)?;
    ensure_dataset_config(&config.output_dir, &config.class_name)?;
    let mut background = Mog2::new(config.background)?;

    info!("Processing video: {}", config.video.display());
    info!("Extracting 1 frame every {} second(s)", config.seconds_per_sample);
    info!("Class: {}", config.class_name);

    let summary = label_frames(
        &mut source,
        &mut background,
        &sampler,
        &mut writer,
        config.min_object_area as f64,
    )?;

    info!(
        "Done! Saved {} new frames (total in dataset: {}) to {}",
        summary.saved,
        summary.next_index,
        config.output_dir.display()
    );
    info!(
        "  Skipped: {} without object, {} too small, {} with invalid box",
        summary.skipped_no_object, summary.skipped_too_small, summary.skipped_invalid_box
    );
    info!("  Images: {}", writer.images_dir().display());
    info!("  Labels: {}", writer.labels_dir().display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackgroundConfig;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use std::collections::VecDeque;
    use std::fs;

    struct MemoryFrameSource {
        frame_rate: f64,
        frames: VecDeque<RgbImage>,
    }

    impl FrameSource for MemoryFrameSource {
        fn frame_rate(&self) -> f64 {
            self.frame_rate
        }

        fn next_frame(&mut self) -> AppResult<Option<RgbImage>> {
            Ok(self.frames.pop_front())
        }
    }

    /// Returns a fixed mask and counts how often it was asked.
    struct ScriptedBackground {
        mask: GrayImage,
        calls: u64,
    }

    impl BackgroundModel for ScriptedBackground {
        fn apply(&mut self, _frame: &RgbImage) -> AppResult<GrayImage> {
            self.calls += 1;
            Ok(self.mask.clone())
        }
    }

    fn square_mask(width: u32, height: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn every_frame_updates_the_background_but_only_samples_are_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MemoryFrameSource {
            frame_rate: 5.0,
            frames: (0..23).map(|_| RgbImage::new(64, 64)).collect(),
        };
        let mut background =
            ScriptedBackground { mask: square_mask(64, 64, 10, 10, 20), calls: 0 };
        let sampler = FrameSampler::new(source.frame_rate(), 1).unwrap();
        let mut writer = DatasetWriter::create(dir.path(), "wheel", None).unwrap();

        let summary =
            label_frames(&mut source, &mut background, &sampler, &mut writer, 100.0).unwrap();

        assert_eq!(background.calls, 23);
        assert_eq!(summary.frames_read, 23);
        assert_eq!(summary.frames_sampled, 4);
        assert_eq!(summary.saved, 4);
        assert_eq!(summary.next_index, 4);
        assert!(dir.path().join("images/wheel_0003.jpg").is_file());
        assert!(!dir.path().join("images/wheel_0004.jpg").exists());
    }

    #[test]
    fn rejections_are_counted_and_nothing_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = FrameSampler::new(1.0, 1).unwrap();
        let mut writer = DatasetWriter::create(dir.path(), "wheel", None).unwrap();
        let frames = || (0..2).map(|_| RgbImage::new(64, 64)).collect::<VecDeque<_>>();

        let mut empty = ScriptedBackground { mask: GrayImage::new(64, 64), calls: 0 };
        let mut source = MemoryFrameSource { frame_rate: 1.0, frames: frames() };
        let summary = label_frames(&mut source, &mut empty, &sampler, &mut writer, 100.0).unwrap();
        assert_eq!(summary.skipped_no_object, 2);

        let mut tiny = ScriptedBackground { mask: square_mask(64, 64, 10, 10, 8), calls: 0 };
        let mut source = MemoryFrameSource { frame_rate: 1.0, frames: frames() };
        let summary = label_frames(&mut source, &mut tiny, &sampler, &mut writer, 100.0).unwrap();
        assert_eq!(summary.skipped_too_small, 2);

        let mut huge = ScriptedBackground { mask: square_mask(64, 64, 1, 1, 62), calls: 0 };
        let mut source = MemoryFrameSource { frame_rate: 1.0, frames: frames() };
        let summary = label_frames(&mut source, &mut huge, &sampler, &mut writer, 100.0).unwrap();
        assert_eq!(summary.skipped_invalid_box, 2);

        assert_eq!(writer.saved(), 0);
        assert_eq!(fs::read_dir(dir.path().join("images")).unwrap().count(), 0);
        assert_eq!(fs::read_dir(dir.path().join("labels")).unwrap().count(), 0);
    }

    #[test]
    fn moving_object_over_static_scene_is_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let mut frames = VecDeque::new();
        for _ in 0..40 {
            frames.push_back(RgbImage::from_pixel(64, 64, Rgb([50, 50, 50])));
        }
        for step in 0..10 {
            let mut frame = RgbImage::from_pixel(64, 64, Rgb([50, 50, 50]));
            for y in 20..36 {
                for x in step * 4..step * 4 + 16 {
                    frame.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
            frames.push_back(frame);
        }
        let mut source = MemoryFrameSource { frame_rate: 2.0, frames };
        let mut background = Mog2::new(BackgroundConfig::default()).unwrap();
        let sampler = FrameSampler::new(source.frame_rate(), 1).unwrap();
        let mut writer = DatasetWriter::create(dir.path(), "wheel", None).unwrap();

        let summary =
            label_frames(&mut source, &mut background, &sampler, &mut writer, 100.0).unwrap();

        assert_eq!(summary.frames_read, 50);
        assert_eq!(summary.frames_sampled, 25);
        assert_eq!(summary.skipped_no_object, 20);
        assert_eq!(summary.saved, 5);
        // Frame 42 holds the square at x = 4..20, y = 20..36.
        let label = fs::read_to_string(dir.path().join("labels/wheel_0000.txt")).unwrap();
        assert_eq!(label, "0 0.187500 0.437500 0.250000 0.250000\n");
    }
}
