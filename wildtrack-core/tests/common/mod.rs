// wildtrack-core/tests/common/mod.rs
//
// In-memory media backend and scripted detector shared by the integration
// tests. A "video" is a small text file describing its frames:
//
//   frames=10       number of decodable frames
//   1:1@2-7         track 1 of class 1 is visible on frames 2..=7
//   fail@4          the detector errors on frame 4
//   delay_ms=20     decoding each frame takes this long
//   rotated         the probed size differs from the decoded frames
//   corrupt         the container cannot be opened
//
// The source paints each frame's objects into the first pixel bytes, so the
// detector needs no side channel to know what it is looking at.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use wildtrack_core::sampling::{Frame, FrameSource, RawFrame, VideoInfo};
use wildtrack_core::{
    BoundingBox, CoreConfigBuilder, CoreError, CoreResult, DetectionFailure, Detector,
    DetectorFactory, MediaBackend, SessionCoordinator, TrackedObject, VideoSink,
};

const WIDTH: u32 = 8;
const HEIGHT: u32 = 8;
const FAIL_MARKER: u8 = 255;

#[derive(Debug, Clone, Default)]
struct VideoScript {
    frames: u64,
    tracks: Vec<(u8, u8, u64, u64)>,
    fail_at: Option<u64>,
    delay: Duration,
    rotated: bool,
}

impl VideoScript {
    fn parse(text: &str) -> Result<Self, String> {
        let mut script = VideoScript::default();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line == "corrupt" {
                return Err("moov atom not found".to_string());
            } else if line == "rotated" {
                script.rotated = true;
            } else if let Some(n) = line.strip_prefix("frames=") {
                script.frames = n.parse().map_err(|_| format!("bad frame count '{}'", n))?;
            } else if let Some(ms) = line.strip_prefix("delay_ms=") {
                let ms: u64 = ms.parse().map_err(|_| format!("bad delay '{}'", ms))?;
                script.delay = Duration::from_millis(ms);
            } else if let Some(n) = line.strip_prefix("fail@") {
                script.fail_at = Some(n.parse().map_err(|_| format!("bad frame '{}'", n))?);
            } else {
                let (ids, range) = line.split_once('@').ok_or("bad track line")?;
                let (track, class) = ids.split_once(':').ok_or("bad track ids")?;
                let (first, last) = range.split_once('-').ok_or("bad track range")?;
                script.tracks.push((
                    track.parse().map_err(|_| "bad track id")?,
                    class.parse().map_err(|_| "bad class id")?,
                    first.parse().map_err(|_| "bad first frame")?,
                    last.parse().map_err(|_| "bad last frame")?,
                ));
            }
        }
        Ok(script)
    }
}

/// Media backend that decodes scripted videos and counts concurrent decodes.
#[derive(Clone, Default)]
pub struct FakeBackend {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest number of videos that were open at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl MediaBackend for FakeBackend {
    type Source = FakeSource;
    type Sink = FakeSink;

    fn open(&self, video: &Path) -> CoreResult<FakeSource> {
        let name = video.display().to_string();
        let text = fs::read_to_string(video).map_err(|e| CoreError::decode(&name, e.to_string()))?;
        let script = VideoScript::parse(&text).map_err(|reason| CoreError::decode(&name, reason))?;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let (width, height) = if script.rotated {
            (WIDTH * 2, HEIGHT / 2)
        } else {
            (WIDTH, HEIGHT)
        };
        Ok(FakeSource {
            info: VideoInfo {
                width,
                height,
                fps: 10.0,
                frame_count: Some(script.frames),
            },
            script,
            next: 0,
            active: Arc::clone(&self.active),
        })
    }

    fn create_sink(&self, output: &Path, info: &VideoInfo) -> CoreResult<FakeSink> {
        Ok(FakeSink {
            file: fs::File::create(output)?,
            width: info.width,
            height: info.height,
        })
    }
}

pub struct FakeSource {
    info: VideoInfo,
    script: VideoScript,
    next: u64,
    active: Arc<AtomicUsize>,
}

impl FrameSource for FakeSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> CoreResult<Option<RawFrame>> {
        if self.next >= self.script.frames {
            return Ok(None);
        }
        let index = self.next;
        self.next += 1;
        if !self.script.delay.is_zero() {
            thread::sleep(self.script.delay);
        }

        let mut frame = RawFrame::blank(WIDTH, HEIGHT);
        if self.script.fail_at == Some(index) {
            frame.data[0] = FAIL_MARKER;
            return Ok(Some(frame));
        }
        let visible: Vec<(u8, u8)> = self
            .script
            .tracks
            .iter()
            .filter(|(_, _, first, last)| (*first..=*last).contains(&index))
            .map(|(track, class, _, _)| (*track, *class))
            .collect();
        frame.data[0] = visible.len() as u8;
        for (i, (track, class)) in visible.into_iter().enumerate() {
            frame.data[1 + 2 * i] = track;
            frame.data[2 + 2 * i] = class;
        }
        Ok(Some(frame))
    }
}

impl Drop for FakeSource {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Writes the raw frames to disk so tests can count them. Rejects frames
/// that do not match the size the sink was created with.
pub struct FakeSink {
    file: fs::File,
    width: u32,
    height: u32,
}

impl VideoSink for FakeSink {
    fn write_frame(&mut self, frame: &RawFrame) -> CoreResult<()> {
        if (frame.width, frame.height) != (self.width, self.height) {
            return Err(CoreError::OperationFailed(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        self.file.write_all(&frame.data)?;
        Ok(())
    }

    fn finish(mut self) -> CoreResult<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Detector factory that counts how many detectors it built.
#[derive(Clone, Default)]
pub struct FakeDetectorFactory {
    created: Arc<AtomicUsize>,
}

impl FakeDetectorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl DetectorFactory for FakeDetectorFactory {
    type Detector = FakeDetector;

    fn create(&self) -> Result<FakeDetector, DetectionFailure> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeDetector { last_frame: None })
    }
}

/// Reads objects back out of the painted frame header and rejects frames
/// that arrive out of order.
pub struct FakeDetector {
    last_frame: Option<u64>,
}

impl Detector for FakeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>, DetectionFailure> {
        if self.last_frame.is_some_and(|last| frame.index <= last) {
            return Err(DetectionFailure::new(format!("frame {} out of order", frame.index)));
        }
        self.last_frame = Some(frame.index);

        let data = &frame.image.data;
        if data[0] == FAIL_MARKER {
            return Err(DetectionFailure::new("model crashed"));
        }
        Ok((0..data[0] as usize)
            .map(|i| TrackedObject {
                track_id: Some(u64::from(data[1 + 2 * i])),
                class_id: u32::from(data[2 + 2 * i]),
                confidence: 0.9,
                bbox: BoundingBox::new(4.0, 4.0, 4.0, 4.0),
            })
            .collect())
    }

    fn reset(&mut self) -> Result<(), DetectionFailure> {
        self.last_frame = None;
        Ok(())
    }
}

/// Writes a scripted video into `dir`.
pub fn write_video(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    path
}

pub type TestCoordinator = SessionCoordinator<FakeBackend, FakeDetectorFactory>;

/// Builds a coordinator whose workspace and archives live under `root`.
pub fn coordinator(root: &Path, workers: usize) -> TestCoordinator {
    coordinator_with(root, workers, None, FakeBackend::new(), FakeDetectorFactory::new())
}

pub fn coordinator_with(
    root: &Path,
    workers: usize,
    timeout: Option<Duration>,
    media: FakeBackend,
    detectors: FakeDetectorFactory,
) -> TestCoordinator {
    let config = CoreConfigBuilder::new()
        .workspace_dir(root.join("work"))
        .archive_dir(root.join("archives"))
        .worker_count(workers)
        .job_timeout(timeout)
        .build()
        .unwrap();
    SessionCoordinator::new(config, media, detectors).unwrap()
}

/// Reads one entry of a zip archive as text.
pub fn read_entry(archive: &[u8], name: &str) -> String {
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
    let mut contents = String::new();
    std::io::Read::read_to_string(&mut zip.by_name(name).unwrap(), &mut contents).unwrap();
    contents
}

/// Lists the entry names of a zip archive in stored order.
pub fn entry_names(archive: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
    zip.file_names().map(str::to_string).collect()
}
