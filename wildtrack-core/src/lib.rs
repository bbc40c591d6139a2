//! Core library for wildlife detection in trail-camera video.
//!
//! This crate samples frames from videos, runs a tracking detector on the
//! sampled frames, aggregates detections into per-video summaries and
//! packages batch results into downloadable archives.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use wildtrack_core::{
//!     BatchRequest, CoreConfig, FfmpegBackend, PreferenceSet, ProcessDetectorFactory,
//!     SessionCoordinator, find_processable_files,
//! };
//! use std::path::Path;
//!
//! let config = CoreConfig::from_env().unwrap();
//! let detectors = ProcessDetectorFactory::from_command_line(
//!     "python3 detect.py --weights best.pt",
//!     config.confidence_threshold,
//! )
//! .unwrap();
//! let coordinator = SessionCoordinator::new(config, FfmpegBackend, detectors).unwrap();
//!
//! let videos = find_processable_files(Path::new("/path/to/clips"), coordinator.config()).unwrap();
//! let report = coordinator
//!     .submit_batch(BatchRequest {
//!         videos,
//!         preferences: "keep_summary,keep_detailed_results".parse::<PreferenceSet>().unwrap(),
//!         stride: None,
//!     })
//!     .unwrap();
//!
//! let archive = coordinator.fetch_archive(&report.session_id).unwrap();
//! println!("{} bytes", archive.len());
//! ```

pub mod aggregation;
pub mod annotate;
pub mod archive;
pub mod config;
pub mod detection;
pub mod discovery;
pub mod error;
pub mod export;
pub mod media;
pub mod model;
pub mod pipeline;
pub mod reporting;
pub mod routing;
pub mod sampling;
pub mod session;
pub mod temp_files;

// Re-exports for public API
pub use aggregation::{TrackAggregator, VideoAggregate, aggregate};
pub use archive::{ArchiveHandle, ArchiveStore, SessionManifest};
pub use config::{AnnotationPolicy, ClassLabels, CoreConfig, CoreConfigBuilder};
pub use detection::{Detector, DetectorFactory, DetectionFailure, ProcessDetectorFactory};
pub use discovery::{expand_inputs, find_processable_files};
pub use error::{CoreError, CoreResult};
pub use export::SummaryTable;
pub use media::{FfmpegBackend, MediaBackend, VideoSink, probe_video};
pub use model::{
    BoundingBox, Detection, FrameStride, JobState, Preference, PreferenceSet, SessionState,
    SummaryRow, Track, TrackedObject,
};
pub use pipeline::{FailureKind, JobFailure, JobOutcome, ResultBundle, VideoJob};
pub use reporting::{JsonReporter, NullReporter, SessionReporter, TerminalReporter};
pub use routing::{ArtifactKind, DestinationGroup};
pub use sampling::{Frame, FrameSampler, FrameSource, RawFrame, VideoInfo};
pub use session::{
    AbortSignal, BatchReport, BatchRequest, DetectionStatus, JobReport, Session, SessionCoordinator,
    SessionId, SingleVideoReport, SingleVideoRequest,
};
