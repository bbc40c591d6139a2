//! Frame sampling.
//!
//! A [`FrameSource`] yields decoded frames in presentation order; the
//! [`FrameSampler`] wraps it in a lazy, single-pass iterator that tags every
//! frame with its index, timestamp and whether it is forwarded to the
//! detector. Unsampled frames still flow through so the annotated copy keeps
//! the original frame count and timing.

use crate::error::CoreResult;
use crate::model::FrameStride;

/// Stream properties reported by a frame source before decoding starts.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second; zero when the container does not declare a rate.
    pub fps: f64,
    pub frame_count: Option<u64>,
}

/// One decoded frame as packed RGB24 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// A black frame of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }
}

/// A frame positioned in its video.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub timestamp_secs: f64,
    pub sampled: bool,
    pub image: RawFrame,
}

/// Sequential access to a video's decoded frames.
///
/// Decode errors are reported as `CoreError::Decode`. `Ok(None)` marks the
/// end of the stream.
pub trait FrameSource {
    fn info(&self) -> &VideoInfo;
    fn next_frame(&mut self) -> CoreResult<Option<RawFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn info(&self) -> &VideoInfo {
        (**self).info()
    }

    fn next_frame(&mut self) -> CoreResult<Option<RawFrame>> {
        (**self).next_frame()
    }
}

/// Lazy iterator applying a stride to a frame source.
///
/// Yields every frame with `sampled = index % stride == 0`. Iteration stops
/// after the first error.
pub struct FrameSampler<S> {
    source: S,
    stride: FrameStride,
    next_index: u64,
    finished: bool,
}

impl<S: FrameSource> FrameSampler<S> {
    pub fn new(source: S, stride: FrameStride) -> Self {
        Self {
            source,
            stride,
            next_index: 0,
            finished: false,
        }
    }

    pub fn info(&self) -> &VideoInfo {
        self.source.info()
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    fn timestamp_for(&self, index: u64) -> f64 {
        let fps = self.source.info().fps;
        if fps > 0.0 { index as f64 / fps } else { 0.0 }
    }
}

impl<S: FrameSource> Iterator for FrameSampler<S> {
    type Item = CoreResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.source.next_frame() {
            Ok(Some(image)) => {
                let index = self.next_index;
                self.next_index += 1;
                Some(Ok(Frame {
                    index,
                    timestamp_secs: self.timestamp_for(index),
                    sampled: self.stride.samples(index),
                    image,
                }))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: FrameSource> std::iter::FusedIterator for FrameSampler<S> {}
