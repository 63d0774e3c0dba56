use crate::error::{AppError, AppResult};
use crate::video::FrameSource;
use image::RgbImage;
use serde_json::Value;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, info, warn};

/// Stream properties needed to decode and sample a video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub codec: String,
    /// Position among the file's video streams, as in ffmpeg's `0:v:<n>` specifier.
    pub video_stream: usize,
}

/// Finds an external tool, honouring a `<TOOL>_PATH` environment override
/// (`FFMPEG_PATH`, `FFPROBE_PATH`, ...).
pub fn resolve_tool_path(tool: &str) -> String {
    let variable = format!("{}_PATH", tool.to_uppercase());
    std::env::var(&variable).unwrap_or_else(|_| tool.to_string())
}

/// Parses ffprobe's rational frame rates ("30000/1001", "25/1", "30").
/// Anything unparsable, or a zero denominator, gives 0.
pub fn parse_frame_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().unwrap_or(0.0);
            let den: f64 = den.trim().parse().unwrap_or(0.0);
            if den == 0.0 { 0.0 } else { num / den }
        }
        None => rate.trim().parse().unwrap_or(0.0),
    }
}

fn open_error(path: &Path, reason: impl Into<String>) -> AppError {
    AppError::VideoOpen { path: path.to_path_buf(), reason: reason.into() }
}

/// Extracts the first real video stream from `ffprobe -print_format json -show_streams`
/// output. Cover art (`attached_pic`) is listed as a video stream too and is skipped.
pub fn parse_probe_output(path: &Path, output: &str) -> AppResult<VideoInfo> {
    let json: Value = serde_json::from_str(output)?;
    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| open_error(path, "ffprobe reported no streams"))?;
    let (video_stream, stream) = streams
        .iter()
        .filter(|stream| stream["codec_type"].as_str() == Some("video"))
        .enumerate()
        .find(|(_, stream)| stream["disposition"]["attached_pic"].as_i64() != Some(1))
        .ok_or_else(|| open_error(path, "no video stream"))?;

    let width = stream["width"].as_u64().unwrap_or(0) as u32;
    let height = stream["height"].as_u64().unwrap_or(0) as u32;
    if width == 0 || height == 0 {
        return Err(open_error(path, "video stream has no frame size"));
    }

    let mut frame_rate = stream["r_frame_rate"].as_str().map(parse_frame_rate).unwrap_or(0.0);
    if frame_rate <= 0.0 {
        frame_rate = stream["avg_frame_rate"].as_str().map(parse_frame_rate).unwrap_or(0.0);
    }

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        frame_rate,
        codec: stream["codec_name"].as_str().unwrap_or("").to_string(),
        video_stream,
    })
}

pub fn probe_video(path: &Path) -> AppResult<VideoInfo> {
    if !path.is_file() {
        return Err(open_error(path, "file does not exist"));
    }
    let ffprobe_path = resolve_tool_path("ffprobe");
    let output = Command::new(&ffprobe_path)
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
        .map_err(|e| open_error(path, format!("failed to run {}: {}", ffprobe_path, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(open_error(path, stderr.trim().to_string()));
    }
    parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
}

/// Decodes a video by piping raw RGB24 frames out of an ffmpeg child process.
///
/// The child is killed when the source is dropped, so abandoning a half-read video
/// does not leave a decoder running.
pub struct FfmpegFrameSource {
    info: VideoInfo,
    child: Child,
    stdout: BufReader<ChildStdout>,
    frame_bytes: usize,
    exhausted: bool,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> AppResult<Self> {
        let info = probe_video(path)?;
        info!(
            "Opened {} ({}x{}, {:.3} fps, {})",
            path.display(),
            info.width,
            info.height,
            info.frame_rate,
            info.codec
        );

        let ffmpeg_path = resolve_tool_path("ffmpeg");
        // Without -noautorotate, rotated videos would not match the probed frame size.
        let mut child = Command::new(&ffmpeg_path)
            .args(["-v", "error", "-nostdin", "-noautorotate", "-i"])
            .arg(path)
            .arg("-map")
            .arg(format!("0:v:{}", info.video_stream))
            .args(["-an", "-sn", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| open_error(path, format!("failed to run {}: {}", ffmpeg_path, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::FFmpeg("decoder stdout was not captured".to_string()))?;
        let frame_bytes = info.width as usize * info.height as usize * 3;

        Ok(FfmpegFrameSource {
            info,
            child,
            stdout: BufReader::new(stdout),
            frame_bytes,
            exhausted: false,
        })
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn finish(&mut self) {
        self.exhausted = true;
        match self.child.wait() {
            Ok(status) if !status.success() => {
                warn!("Decoder for {} exited with {}", self.info.path.display(), status)
            }
            Ok(_) => debug!("Decoder for {} finished", self.info.path.display()),
            Err(e) => warn!("Could not reap decoder: {}", e),
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    fn next_frame(&mut self) -> AppResult<Option<RgbImage>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut buffer = vec![0u8; self.frame_bytes];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => {}
            // A truncated trailing frame counts as end of stream.
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finish();
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        RgbImage::from_raw(self.info.width, self.info.height, buffer)
            .map(Some)
            .ok_or_else(|| AppError::FFmpeg("decoded frame has the wrong size".to_string()))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if !self.exhausted {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rates() {
        assert_eq!(parse_frame_rate("30/1"), 30.0);
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("garbage"), 0.0);
    }

    #[test]
    fn probe_output_picks_the_video_stream() {
        let output = r#"{
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080,
                 "r_frame_rate": "0/0", "avg_frame_rate": "30/1"}
            ]
        }"#;
        let info = parse_probe_output(Path::new("wheel.mp4"), output).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.frame_rate, 30.0);
        assert_eq!(info.codec, "h264");
        assert_eq!(info.video_stream, 0);
    }

    #[test]
    fn probe_output_skips_cover_art() {
        let output = r#"{
            "streams": [
                {"codec_type": "video", "codec_name": "mjpeg", "width": 600, "height": 600,
                 "r_frame_rate": "90000/1", "disposition": {"default": 0, "attached_pic": 1}},
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 1280, "height": 720,
                 "r_frame_rate": "25/1", "disposition": {"default": 1, "attached_pic": 0}}
            ]
        }"#;
        let info = parse_probe_output(Path::new("wheel.mp4"), output).unwrap();
        assert_eq!((info.width, info.height), (1280, 720));
        assert_eq!(info.codec, "h264");
        assert_eq!(info.frame_rate, 25.0);
        assert_eq!(info.video_stream, 1);
    }

    #[test]
    fn cover_art_alone_is_not_a_video() {
        let output = r#"{"streams": [{"codec_type": "video", "width": 600, "height": 600,
            "disposition": {"attached_pic": 1}}]}"#;
        assert!(matches!(
            parse_probe_output(Path::new("song.m4a"), output),
            Err(AppError::VideoOpen { .. })
        ));
    }

    #[test]
    fn probe_output_without_video_is_an_open_error() {
        let output = r#"{"streams": [{"codec_type": "audio"}]}"#;
        assert!(matches!(
            parse_probe_output(Path::new("song.mp3"), output),
            Err(AppError::VideoOpen { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        assert!(matches!(FfmpegFrameSource::open(&missing), Err(AppError::VideoOpen { .. })));
    }
}
