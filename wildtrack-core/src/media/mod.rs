//! Video decode/encode collaborators.
//!
//! The pipeline only needs two capabilities from the media layer: a
//! [`FrameSource`] for reading a video and a [`VideoSink`] for writing the
//! annotated copy. [`MediaBackend`] bundles both so tests can swap in
//! in-memory implementations. [`FfmpegBackend`] is the production backend.

pub mod ffmpeg;
pub mod probe;

use std::path::Path;

use crate::error::CoreResult;
use crate::sampling::{FrameSource, RawFrame, VideoInfo};

pub use ffmpeg::{FfmpegBackend, FfmpegFrameSource, FfmpegVideoSink};
pub use probe::probe_video;

/// Receives every frame of the annotated copy, in order.
pub trait VideoSink {
    fn write_frame(&mut self, frame: &RawFrame) -> CoreResult<()>;

    /// Flushes and closes the output. Dropping a sink without calling this
    /// abandons the output.
    fn finish(self) -> CoreResult<()>;
}

/// Factory for frame sources and annotated-video sinks.
pub trait MediaBackend: Send + Sync {
    type Source: FrameSource;
    type Sink: VideoSink;

    /// Opens `video` for decoding. Unreadable or unsupported input is a
    /// `CoreError::Decode`.
    fn open(&self, video: &Path) -> CoreResult<Self::Source>;

    /// Creates an encoder writing to `output` with the timing of `info`.
    fn create_sink(&self, output: &Path, info: &VideoInfo) -> CoreResult<Self::Sink>;
}
