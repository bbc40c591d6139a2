// ============================================================================
// wildtrack-core/src/media/ffmpeg.rs
// ============================================================================
//
// FFMPEG BACKEND: Decode and Encode through ffmpeg-sidecar
//
// Decoding runs ffmpeg with RGB24 rawvideo on stdout and consumes the
// sidecar event stream one output frame at a time, so frames are pulled
// lazily as the sampler asks for them. Encoding pipes RGB24 frames into an
// H.264 encoder running at the source frame rate.
//
// KEY COMPONENTS:
// - FfmpegBackend: MediaBackend implementation
// - FfmpegFrameSource: lazy decoder
// - FfmpegVideoSink: annotated video encoder

// ---- External crate imports ----
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use log::{debug, warn};

// ---- Internal crate imports ----
use super::{MediaBackend, VideoSink, probe_video};
use crate::error::{CoreError, CoreResult};
use crate::sampling::{FrameSource, RawFrame, VideoInfo};

// ---- Standard library imports ----
use std::io::Write;
use std::path::Path;
use std::process::ChildStdin;

/// Frame rate assumed for the encoder when the source does not declare one.
const FALLBACK_FPS: f64 = 25.0;

/// Production media backend using the ffprobe and ffmpeg binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend;

impl MediaBackend for FfmpegBackend {
    type Source = FfmpegFrameSource;
    type Sink = FfmpegVideoSink;

    fn open(&self, video: &Path) -> CoreResult<FfmpegFrameSource> {
        FfmpegFrameSource::open(video)
    }

    fn create_sink(&self, output: &Path, info: &VideoInfo) -> CoreResult<FfmpegVideoSink> {
        FfmpegVideoSink::create(output, info)
    }
}

/// Decodes a video into RGB24 frames on demand.
pub struct FfmpegFrameSource {
    video: String,
    info: VideoInfo,
    child: FfmpegChild,
    events: FfmpegIterator,
    last_error: Option<String>,
    finished: bool,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> CoreResult<Self> {
        let video = path.display().to_string();
        let info = probe_video(path)?;
        debug!(
            "Decoding {} ({}x{} @ {:.3} fps)",
            video, info.width, info.height, info.fps
        );

        let mut cmd = FfmpegCommand::new();
        cmd.arg("-hide_banner").input(&video).rawvideo();
        let mut child = cmd
            .spawn()
            .map_err(|e| CoreError::decode(&video, format!("failed to start ffmpeg: {}", e)))?;
        let events = child
            .iter()
            .map_err(|e| CoreError::decode(&video, format!("failed to read ffmpeg output: {}", e)))?;

        Ok(Self {
            video,
            info,
            child,
            events,
            last_error: None,
            finished: false,
        })
    }

    fn complete(&mut self) -> CoreResult<Option<RawFrame>> {
        self.finished = true;
        let status = self
            .child
            .wait()
            .map_err(|e| CoreError::decode(&self.video, format!("failed to wait for ffmpeg: {}", e)))?;
        if status.success() {
            Ok(None)
        } else {
            let reason = self
                .last_error
                .take()
                .unwrap_or_else(|| format!("ffmpeg exited with {}", status));
            Err(CoreError::decode(&self.video, reason))
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> CoreResult<Option<RawFrame>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            match self.events.next() {
                Some(FfmpegEvent::OutputFrame(frame)) => {
                    return Ok(Some(RawFrame {
                        width: frame.width,
                        height: frame.height,
                        data: frame.data,
                    }));
                }
                Some(FfmpegEvent::Error(message))
                | Some(FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message)) => {
                    debug!("ffmpeg ({}): {}", self.video, message);
                    self.last_error = Some(message);
                }
                Some(FfmpegEvent::Done) | None => return self.complete(),
                Some(_) => {}
            }
        }
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.child.kill() {
                debug!("ffmpeg decoder for {} already exited: {}", self.video, e);
            }
            let _ = self.child.wait();
        }
    }
}

/// Encodes RGB24 frames into an H.264 file.
pub struct FfmpegVideoSink {
    output: String,
    child: FfmpegChild,
    stdin: Option<ChildStdin>,
    finished: bool,
}

impl FfmpegVideoSink {
    pub fn create(output: &Path, info: &VideoInfo) -> CoreResult<Self> {
        let output_str = output.display().to_string();
        let fps = if info.fps > 0.0 { info.fps } else { FALLBACK_FPS };
        let input_args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-nostats".to_string(),
            "-y".to_string(),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgb24".to_string(),
            "-s".to_string(),
            format!("{}x{}", info.width, info.height),
            "-r".to_string(),
            format!("{:.6}", fps),
        ];
        let output_args = [
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-preset",
            "veryfast",
            "-pix_fmt",
            "yuv420p",
        ];

        let mut cmd = FfmpegCommand::new();
        cmd.args(&input_args)
            .input("-")
            .args(output_args)
            .output(&output_str);
        debug!("Starting annotated video encoder for {}", output_str);

        let mut child = cmd.spawn().map_err(|e| {
            CoreError::OperationFailed(format!("failed to start ffmpeg encoder: {}", e))
        })?;
        let stdin = child
            .take_stdin()
            .ok_or_else(|| CoreError::OperationFailed("ffmpeg encoder stdin unavailable".to_string()))?;

        Ok(Self {
            output: output_str,
            child,
            stdin: Some(stdin),
            finished: false,
        })
    }
}

impl VideoSink for FfmpegVideoSink {
    fn write_frame(&mut self, frame: &RawFrame) -> CoreResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| CoreError::OperationFailed("encoder input already closed".to_string()))?;
        stdin.write_all(&frame.data)?;
        Ok(())
    }

    fn finish(mut self) -> CoreResult<()> {
        drop(self.stdin.take());
        self.finished = true;
        let status = self.child.wait()?;
        if !status.success() {
            return Err(CoreError::OperationFailed(format!(
                "ffmpeg encoder for {} exited with {}",
                self.output, status
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegVideoSink {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Abandoning annotated video {}", self.output);
            drop(self.stdin.take());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
