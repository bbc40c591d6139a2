//! Detector adapter backed by an external tracker process.
//!
//! The process is spawned lazily on the first frame and speaks a line based
//! protocol over stdio. For every sampled frame the adapter writes one JSON
//! header line followed by `width * height * 3` bytes of RGB24 pixels:
//!
//! ```text
//! {"frame_index":0,"width":640,"height":360,"confidence":0.75}\n<raw bytes>
//! ```
//!
//! and reads exactly one JSON line back, either
//! `{"detections":[{"track_id":1,"class_id":2,"confidence":0.9,"bbox":[cx,cy,w,h]}]}`
//! or `{"error":"message"}`. Resetting terminates the process; the next frame
//! starts a new one with empty tracking state.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::{DetectionFailure, Detector, DetectorFactory};
use crate::model::{BoundingBox, TrackedObject};
use crate::sampling::Frame;

#[derive(Serialize)]
struct FrameHeader {
    frame_index: u64,
    width: u32,
    height: u32,
    confidence: f32,
}

#[derive(Deserialize)]
struct WireObject {
    track_id: Option<u64>,
    class_id: u32,
    confidence: f32,
    bbox: [f32; 4],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Reply {
    Detections { detections: Vec<WireObject> },
    Error { error: String },
}

/// Creates a [`ProcessDetector`] per job from a fixed command line.
#[derive(Debug, Clone)]
pub struct ProcessDetectorFactory {
    program: String,
    args: Vec<String>,
    confidence: f32,
}

impl ProcessDetectorFactory {
    pub fn new(program: impl Into<String>, args: Vec<String>, confidence: f32) -> Self {
        Self {
            program: program.into(),
            args,
            confidence,
        }
    }

    /// Splits a whitespace separated command line such as `python3 track.py --model best.pt`.
    pub fn from_command_line(command: &str, confidence: f32) -> Result<Self, DetectionFailure> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| DetectionFailure::new("detector command is empty"))?;
        Ok(Self::new(program, parts.collect(), confidence))
    }
}

impl DetectorFactory for ProcessDetectorFactory {
    type Detector = ProcessDetector;

    fn create(&self) -> Result<ProcessDetector, DetectionFailure> {
        Ok(ProcessDetector {
            program: self.program.clone(),
            args: self.args.clone(),
            confidence: self.confidence,
            running: None,
        })
    }
}

struct RunningTracker {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

/// One tracker process bound to one video.
pub struct ProcessDetector {
    program: String,
    args: Vec<String>,
    confidence: f32,
    running: Option<RunningTracker>,
}

impl ProcessDetector {
    fn spawn(&self) -> Result<RunningTracker, DetectionFailure> {
        debug!("Starting detector process: {} {}", self.program, self.args.join(" "));
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DetectionFailure::new(format!("failed to start '{}': {}", self.program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DetectionFailure::new("detector stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DetectionFailure::new("detector stdout unavailable"))?;

        Ok(RunningTracker {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
        })
    }

    fn exchange(&mut self, frame: &Frame) -> Result<Reply, DetectionFailure> {
        if self.running.is_none() {
            self.running = Some(self.spawn()?);
        }
        let header = FrameHeader {
            frame_index: frame.index,
            width: frame.image.width,
            height: frame.image.height,
            confidence: self.confidence,
        };
        let tracker = self
            .running
            .as_mut()
            .ok_or_else(|| DetectionFailure::new("detector process not running"))?;

        let io_err = |e: std::io::Error| DetectionFailure::new(format!("detector I/O error: {}", e));
        let line = serde_json::to_string(&header)
            .map_err(|e| DetectionFailure::new(format!("failed to encode frame header: {}", e)))?;
        tracker.stdin.write_all(line.as_bytes()).map_err(io_err)?;
        tracker.stdin.write_all(b"\n").map_err(io_err)?;
        tracker.stdin.write_all(&frame.image.data).map_err(io_err)?;
        tracker.stdin.flush().map_err(io_err)?;

        let mut reply = String::new();
        let read = tracker.stdout.read_line(&mut reply).map_err(io_err)?;
        if read == 0 {
            return Err(DetectionFailure::new("detector process closed its output"));
        }
        serde_json::from_str(reply.trim())
            .map_err(|e| DetectionFailure::new(format!("malformed detector reply: {}", e)))
    }

    fn stop(&mut self) {
        if let Some(mut tracker) = self.running.take() {
            drop(tracker.stdin);
            if let Err(e) = tracker.child.kill() {
                debug!("Detector process already exited: {}", e);
            }
            if let Err(e) = tracker.child.wait() {
                warn!("Failed to reap detector process: {}", e);
            }
        }
    }
}

impl Detector for ProcessDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>, DetectionFailure> {
        match self.exchange(frame) {
            Ok(Reply::Detections { detections }) => Ok(detections
                .into_iter()
                .map(|o| TrackedObject {
                    track_id: o.track_id,
                    class_id: o.class_id,
                    confidence: o.confidence,
                    bbox: BoundingBox::new(o.bbox[0], o.bbox[1], o.bbox[2], o.bbox[3]),
                })
                .collect()),
            Ok(Reply::Error { error }) => Err(DetectionFailure(error)),
            Err(e) => {
                self.stop();
                Err(e)
            }
        }
    }

    fn reset(&mut self) -> Result<(), DetectionFailure> {
        self.stop();
        Ok(())
    }
}

impl Drop for ProcessDetector {
    fn drop(&mut self) {
        self.stop();
    }
}
