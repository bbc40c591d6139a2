// ============================================================================
// wildtrack-core/src/pipeline.rs
// ============================================================================
//
// VIDEO JOB PIPELINE: Sampler -> Detector -> Aggregator -> Classifier
//
// Runs one video job from its first decoded frame to a routed result bundle,
// writing the requested per-video artifacts into the job's directory. Frames
// are processed strictly in index order. Every job builds its own detector
// through the factory, so tracking state never crosses job boundaries.
//
// Failures are returned as data (`JobOutcome::Failed`) so the session
// coordinator can aggregate mixed outcomes uniformly.
//
// KEY COMPONENTS:
// - VideoJob: job identity, preferences and lifecycle state
// - ResultBundle / JobFailure / JobOutcome: tagged per-job result
// - JobContext: collaborators and settings shared by all jobs
// - run_job / execute_job: the pipeline itself

// ---- External crate imports ----
use log::{debug, info, warn};
use serde::Serialize;

// ---- Internal crate imports ----
use crate::aggregation::{TrackAggregator, VideoAggregate};
use crate::annotate::Annotator;
use crate::config::CoreConfig;
use crate::detection::{Detector, DetectorFactory, label_objects};
use crate::error::{CoreError, CoreResult};
use crate::export::{render_detailed_csv, render_video_summary};
use crate::media::{MediaBackend, VideoSink};
use crate::model::{FrameStride, JobState, Preference, PreferenceSet, SummaryRow, Track};
use crate::routing::{ArtifactKind, RoutingDecision, route};
use crate::sampling::{FrameSampler, FrameSource, VideoInfo};

// ---- Standard library imports ----
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One video inside a session.
#[derive(Debug, Clone, Serialize)]
pub struct VideoJob {
    /// Position in submission order.
    pub slot: usize,
    pub video: PathBuf,
    /// Unique name of the video within its session.
    pub name: String,
    pub preferences: PreferenceSet,
    pub stride: FrameStride,
    pub state: JobState,
}

impl VideoJob {
    pub fn new(slot: usize, video: PathBuf, name: String, preferences: PreferenceSet, stride: FrameStride) -> Self {
        Self {
            slot,
            video,
            name,
            preferences,
            stride,
            state: JobState::Pending,
        }
    }

    fn advance(&mut self, state: JobState) {
        debug!("Job {} ({}): {:?} -> {:?}", self.slot, self.name, self.state, state);
        self.state = state;
    }
}

/// Everything a finished job produced.
#[derive(Debug, Clone, Serialize)]
pub struct ResultBundle {
    pub summary: SummaryRow,
    pub tracks: Vec<Track>,
    pub frames_read: u64,
    pub detections: usize,
    pub routing: RoutingDecision,
    /// Materialised artifacts and where they were written.
    pub artifacts: BTreeMap<ArtifactKind, PathBuf>,
}

/// Category of a job-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Decode,
    Detection,
    Timeout,
    Cancelled,
    Artifact,
    Panic,
}

/// Why a job failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl JobFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl From<CoreError> for JobFailure {
    fn from(err: CoreError) -> Self {
        let kind = match &err {
            CoreError::Decode { .. } => FailureKind::Decode,
            CoreError::Detection(_) => FailureKind::Detection,
            CoreError::Timeout(_) => FailureKind::Timeout,
            CoreError::Cancelled => FailureKind::Cancelled,
            _ => FailureKind::Artifact,
        };
        JobFailure::new(kind, err.to_string())
    }
}

/// Tagged per-job result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Done(ResultBundle),
    Failed(JobFailure),
}

impl JobOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, JobOutcome::Done(_))
    }

    pub fn bundle(&self) -> Option<&ResultBundle> {
        match self {
            JobOutcome::Done(bundle) => Some(bundle),
            JobOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        match self {
            JobOutcome::Done(_) => None,
            JobOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// A job together with its terminal outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedJob {
    pub job: VideoJob,
    pub outcome: JobOutcome,
}

/// Collaborators and settings shared by every job of a session.
pub struct JobContext<'a, M, D> {
    pub media: &'a M,
    pub detectors: &'a D,
    pub config: &'a CoreConfig,
}

impl<M, D> Clone for JobContext<'_, M, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, D> Copy for JobContext<'_, M, D> {}

/// Runs `job` to a terminal state and returns it with its outcome.
pub fn run_job<M, D>(mut job: VideoJob, ctx: JobContext<'_, M, D>, job_dir: &Path) -> ResolvedJob
where
    M: MediaBackend,
    D: DetectorFactory,
{
    info!("Job {}: processing {}", job.slot, job.video.display());
    let started = Instant::now();
    let outcome = match execute_job(&mut job, ctx, job_dir) {
        Ok(bundle) => {
            job.advance(JobState::Done);
            info!(
                "Job {}: {} finished in {:.1}s, {} track(s), group {}",
                job.slot,
                job.name,
                started.elapsed().as_secs_f64(),
                bundle.tracks.len(),
                bundle.routing.group
            );
            JobOutcome::Done(bundle)
        }
        Err(e) => {
            job.advance(JobState::Failed);
            warn!("Job {}: {} failed: {}", job.slot, job.name, e);
            JobOutcome::Failed(JobFailure::from(e))
        }
    };
    ResolvedJob { job, outcome }
}

fn check_deadline(deadline: Option<(Instant, Duration)>) -> CoreResult<()> {
    match deadline {
        Some((started, limit)) if started.elapsed() > limit => Err(CoreError::Timeout(limit)),
        _ => Ok(()),
    }
}

/// Runs the pipeline for `job`, returning request-level errors unchanged.
///
/// Used directly by the single-video flow, which reports errors to the
/// caller instead of recording them.
pub fn execute_job<M, D>(job: &mut VideoJob, ctx: JobContext<'_, M, D>, job_dir: &Path) -> CoreResult<ResultBundle>
where
    M: MediaBackend,
    D: DetectorFactory,
{
    let deadline = ctx.config.job_timeout.map(|limit| (Instant::now(), limit));
    let preferences = job.preferences.clone();

    // ---- Sampling ----
    job.advance(JobState::Sampling);
    if !ctx.config.is_supported_video(&job.video) {
        return Err(CoreError::decode(
            job.video.display().to_string(),
            format!(
                "unsupported container; expected one of: {}",
                ctx.config.supported_extensions.join(", ")
            ),
        ));
    }
    let source = ctx.media.open(&job.video)?;
    let info = source.info().clone();
    let mut sampler = FrameSampler::new(source, job.stride);

    let mut detector = ctx.detectors.create()?;
    detector.reset()?;

    // ---- Detecting ----
    job.advance(JobState::Detecting);
    let annotated_path = job_dir.join(ArtifactKind::AnnotatedVideo.file_name(&job.name));
    let wants_annotated = preferences.contains(Preference::GenerateAnnotatedVideo);
    let mut sink: Option<M::Sink> = None;
    let mut annotator = Annotator::new(ctx.config.annotation_policy);
    let mut aggregator = TrackAggregator::new();
    let mut detections = Vec::new();

    loop {
        check_deadline(deadline)?;
        let Some(frame) = sampler.next() else {
            break;
        };
        let mut frame = frame?;

        let current = if frame.sampled {
            let objects = detector.detect(&frame)?;
            check_deadline(deadline)?;
            let labelled = label_objects(&frame, objects, &ctx.config.class_labels);
            labelled.iter().for_each(|d| aggregator.ingest(d));
            Some(labelled)
        } else {
            None
        };

        if wants_annotated {
            if sink.is_none() {
                // Decoded frames may be rotated relative to the probed stream.
                let output = VideoInfo {
                    width: frame.image.width,
                    height: frame.image.height,
                    ..info.clone()
                };
                sink = Some(ctx.media.create_sink(&annotated_path, &output)?);
            }
            annotator.annotate(&mut frame, current.as_deref());
            if let Some(sink) = sink.as_mut() {
                sink.write_frame(&frame.image)?;
            }
        }
        if let Some(labelled) = current {
            detections.extend(labelled);
        }
    }
    let frames_read = sampler.frames_read();
    drop(detector);

    // ---- Aggregating ----
    job.advance(JobState::Aggregating);
    let aggregate = aggregator.finish(&job.name);
    debug!(
        "Job {}: {} frame(s), {} detection(s), {} track(s)",
        job.slot,
        frames_read,
        detections.len(),
        aggregate.tracks.len()
    );

    let mut produced = BTreeMap::new();
    if let Some(sink) = sink {
        sink.finish()?;
        produced.insert(ArtifactKind::AnnotatedVideo, annotated_path);
    }
    write_artifacts(job, &aggregate, &detections, job_dir, &mut produced)?;

    let routing = route(aggregate.detected(), produced.keys().copied(), &preferences);
    produced.retain(|kind, _| routing.artifacts.contains(kind));

    Ok(ResultBundle {
        summary: aggregate.summary,
        tracks: aggregate.tracks,
        frames_read,
        detections: detections.len(),
        routing,
        artifacts: produced,
    })
}

fn write_artifacts(
    job: &VideoJob,
    aggregate: &VideoAggregate,
    detections: &[crate::model::Detection],
    job_dir: &Path,
    produced: &mut BTreeMap<ArtifactKind, PathBuf>,
) -> CoreResult<()> {
    let prefs = &job.preferences;
    if prefs.contains(Preference::KeepDetailedResults) {
        let path = job_dir.join(ArtifactKind::DetailedResults.file_name(&job.name));
        fs::write(&path, render_detailed_csv(detections))?;
        produced.insert(ArtifactKind::DetailedResults, path);
    }
    if prefs.contains(Preference::KeepSummary) {
        let path = job_dir.join(ArtifactKind::VideoSummary.file_name(&job.name));
        fs::write(&path, render_video_summary(aggregate))?;
        produced.insert(ArtifactKind::VideoSummary, path);
    }
    if prefs.contains(Preference::KeepOriginal) {
        let path = job_dir.join(ArtifactKind::OriginalVideo.file_name(&job.name));
        if path != job.video {
            fs::copy(&job.video, &path)?;
        }
        produced.insert(ArtifactKind::OriginalVideo, path);
    }
    Ok(())
}
