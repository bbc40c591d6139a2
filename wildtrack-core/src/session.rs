// ============================================================================
// wildtrack-core/src/session.rs
// ============================================================================
//
// SESSION COORDINATION: Batch Sessions under Bounded Concurrency
//
// A batch submission becomes a Session that moves through
// Open -> Finalizing -> Complete | Failed. Jobs run on a dedicated rayon pool
// sized by the configured worker count. Each worker owns its job outright and
// writes the result into a fixed-size table of write-once slots indexed by
// submission slot; the table is read only after every slot is filled. A job
// failure (or panic) is recorded in its slot and never affects siblings.
//
// Once every slot is filled the session packages its archive. Packaging is
// all-or-nothing: on failure the session ends Failed and nothing is
// persisted. The session workspace is released when the session ends.
//
// KEY COMPONENTS:
// - SessionId: timestamped unique token, validated before any lookup
// - AbortSignal: cooperative session-level cancellation
// - OutcomeTable: write-once per-slot outcome storage
// - SessionCoordinator: batch, single-video and retrieval entry points
// - BatchReport / SingleVideoReport: caller-facing results

// ---- External crate imports ----
use chrono::{DateTime, Local};
use log::{error, info, warn};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

// ---- Internal crate imports ----
use crate::archive::{
    ArchiveHandle, ArchiveStore, ManifestJob, SessionManifest, SummaryExports, archive_path,
    plan_archive, summary_table, write_archive,
};
use crate::config::CoreConfig;
use crate::detection::DetectorFactory;
use crate::error::{CoreError, CoreResult};
use crate::media::MediaBackend;
use crate::model::{FrameStride, JobState, Preference, PreferenceSet, SessionState, SummaryRow};
use crate::pipeline::{
    FailureKind, JobContext, JobFailure, JobOutcome, ResolvedJob, VideoJob, execute_job, run_job,
};
use crate::reporting::{
    BatchStartInfo, JobFinishedInfo, NullReporter, SessionFinishedInfo, SessionReporter,
};
use crate::routing::{ArtifactKind, DestinationGroup};
use crate::temp_files::{create_job_dir, create_session_workspace};

// ---- Standard library imports ----
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Opaque session identifier: `YYYYmmddHHMMSS_<uuid v4>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh identifier stamped with the local time.
    pub fn generate() -> Self {
        Self::generate_at(Local::now())
    }

    pub fn generate_at(now: DateTime<Local>) -> Self {
        SessionId(format!("{}_{}", now.format("%Y%m%d%H%M%S"), Uuid::new_v4()))
    }

    /// Accepts only identifiers that are safe to use as file names.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let valid = !value.is_empty()
            && value.len() <= 128
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(SessionId(value.to_string()))
        } else {
            Err(CoreError::Validation(format!("malformed session id '{}'", value)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-level cancellation flag.
///
/// Raising it stops new jobs from being dispatched; jobs already running
/// finish and record their outcome. The session then ends Failed without an
/// archive.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fixed-size table of write-once job outcomes indexed by slot.
pub struct OutcomeTable {
    slots: Vec<OnceCell<ResolvedJob>>,
}

impl OutcomeTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Stores the outcome for `resolved.job.slot`. A slot can only be written once.
    pub fn record(&self, resolved: ResolvedJob) -> CoreResult<()> {
        let slot = resolved.job.slot;
        let cell = self.slots.get(slot).ok_or_else(|| {
            CoreError::OperationFailed(format!("job slot {} out of range", slot))
        })?;
        cell.set(resolved).map_err(|_| {
            CoreError::OperationFailed(format!("job slot {} already resolved", slot))
        })
    }

    /// Consumes the table once every slot is filled, in slot order.
    pub fn into_resolved(self) -> CoreResult<Vec<ResolvedJob>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(slot, cell)| {
                cell.into_inner().ok_or_else(|| {
                    CoreError::OperationFailed(format!("job slot {} never resolved", slot))
                })
            })
            .collect()
    }
}

/// A batch submission: the same preferences and stride apply to every video.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub videos: Vec<PathBuf>,
    pub preferences: PreferenceSet,
    /// Falls back to the configured stride when absent.
    pub stride: Option<FrameStride>,
}

/// A single-video submission. Artifacts are written to `output_dir`.
#[derive(Debug, Clone)]
pub struct SingleVideoRequest {
    pub video: PathBuf,
    pub preferences: PreferenceSet,
    pub stride: Option<FrameStride>,
    pub output_dir: PathBuf,
}

/// Batch session with its resolved jobs.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Local>,
    pub state: SessionState,
    pub preferences: PreferenceSet,
    pub stride: FrameStride,
    pub jobs: Vec<ResolvedJob>,
    pub archive: Option<ArchiveHandle>,
    /// Why the archive could not be built, when packaging failed.
    pub packaging_error: Option<String>,
}

/// Caller-facing view of one job in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub slot: usize,
    pub video_name: String,
    pub source: PathBuf,
    pub state: JobState,
    pub detected: Option<bool>,
    pub group: Option<DestinationGroup>,
    pub counts: BTreeMap<String, usize>,
    /// Artifact name to archive-relative path.
    pub artifacts: BTreeMap<String, String>,
    pub failure: Option<JobFailure>,
}

/// Caller-facing result of a batch submission.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub session_id: String,
    pub state: SessionState,
    pub created_at: DateTime<Local>,
    pub jobs: Vec<JobReport>,
    /// Video names per destination group, in submission order.
    pub groups: BTreeMap<DestinationGroup, Vec<String>>,
    pub archive: Option<ArchiveHandle>,
    pub packaging_error: Option<String>,
}

impl BatchReport {
    pub fn from_session(session: &Session) -> Self {
        let archived = session.archive.is_some();
        let mut groups: BTreeMap<DestinationGroup, Vec<String>> =
            DestinationGroup::ALL.iter().map(|g| (*g, Vec::new())).collect();

        let jobs = session
            .jobs
            .iter()
            .map(|resolved| {
                let job = &resolved.job;
                match &resolved.outcome {
                    JobOutcome::Done(bundle) => {
                        let group = bundle.routing.group;
                        groups.entry(group).or_default().push(job.name.clone());
                        let artifacts = if archived {
                            bundle
                                .artifacts
                                .keys()
                                .map(|kind| (kind.key().to_string(), archive_path(group, *kind, &job.name)))
                                .collect()
                        } else {
                            BTreeMap::new()
                        };
                        JobReport {
                            slot: job.slot,
                            video_name: job.name.clone(),
                            source: job.video.clone(),
                            state: job.state,
                            detected: Some(bundle.summary.detected),
                            group: Some(group),
                            counts: bundle.summary.counts.clone(),
                            artifacts,
                            failure: None,
                        }
                    }
                    JobOutcome::Failed(failure) => JobReport {
                        slot: job.slot,
                        video_name: job.name.clone(),
                        source: job.video.clone(),
                        state: job.state,
                        detected: None,
                        group: None,
                        counts: BTreeMap::new(),
                        artifacts: BTreeMap::new(),
                        failure: Some(failure.clone()),
                    },
                }
            })
            .collect();

        BatchReport {
            session_id: session.id.to_string(),
            state: session.state,
            created_at: session.created_at,
            jobs,
            groups,
            archive: session.archive.clone(),
            packaging_error: session.packaging_error.clone(),
        }
    }
}

/// Video-level verdict of the single-video flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionStatus {
    AnimalsDetected,
    NoAnimalsDetected,
}

impl DetectionStatus {
    pub fn message(&self) -> &'static str {
        match self {
            DetectionStatus::AnimalsDetected => {
                "The uploaded video contains identifiable wildlife species."
            }
            DetectionStatus::NoAnimalsDetected => "No animals detected in the uploaded video.",
        }
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStatus::AnimalsDetected => f.write_str("Animals detected"),
            DetectionStatus::NoAnimalsDetected => f.write_str("No animals detected"),
        }
    }
}

/// Caller-facing result of a single-video submission.
#[derive(Debug, Clone, Serialize)]
pub struct SingleVideoReport {
    pub video_name: String,
    pub status: String,
    pub message: String,
    pub detected: bool,
    pub summary: SummaryRow,
    /// Artifact name to file location.
    pub artifacts: BTreeMap<String, PathBuf>,
}

/// Archive file names derived from a video name, folded for comparison.
fn artifact_file_names(name: &str) -> Vec<String> {
    ArtifactKind::ALL
        .iter()
        .map(|kind| kind.file_name(name).to_lowercase())
        .collect()
}

/// Gives each video a name unique within the batch: `clip.mp4`, `clip_2.avi`, ...
///
/// Artifact files are named after the stem, so a name is only accepted when
/// none of its artifact file names is already taken.
fn assign_names(videos: &[PathBuf]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    videos
        .iter()
        .map(|video| {
            let base = video
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "video".to_string());
            let path = Path::new(&base);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| base.clone());
            let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

            let renamed = (2..).map(|n| match &ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            });
            std::iter::once(base.clone())
                .chain(renamed)
                .find(|candidate| {
                    let files = artifact_file_names(candidate);
                    if files.iter().any(|f| taken.contains(f)) {
                        return false;
                    }
                    taken.extend(files);
                    true
                })
                .unwrap_or(base)
        })
        .collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Entry point for processing submissions and retrieving archives.
pub struct SessionCoordinator<M, D> {
    config: CoreConfig,
    media: M,
    detectors: D,
    store: ArchiveStore,
}

impl<M, D> SessionCoordinator<M, D>
where
    M: MediaBackend,
    D: DetectorFactory,
{
    pub fn new(config: CoreConfig, media: M, detectors: D) -> CoreResult<Self> {
        config.validate()?;
        let store = ArchiveStore::new(config.archive_dir.clone(), config.archive_ttl);
        Ok(Self {
            config,
            media,
            detectors,
            store,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    fn context(&self) -> JobContext<'_, M, D> {
        JobContext {
            media: &self.media,
            detectors: &self.detectors,
            config: &self.config,
        }
    }

    /// Processes a batch and returns once every job has resolved and the
    /// archive is persisted.
    ///
    /// A packaging failure still yields a report: the session is `Failed`,
    /// every job outcome is listed and `packaging_error` holds the reason.
    pub fn submit_batch(&self, request: BatchRequest) -> CoreResult<BatchReport> {
        let session = self.run_session(request, &AbortSignal::new(), &NullReporter)?;
        Ok(BatchReport::from_session(&session))
    }

    /// Like [`submit_batch`](Self::submit_batch) with a cancellation signal and progress reporter.
    pub fn run_session(
        &self,
        request: BatchRequest,
        abort: &AbortSignal,
        reporter: &dyn SessionReporter,
    ) -> CoreResult<Session> {
        if request.videos.is_empty() {
            return Err(CoreError::Validation(
                "at least one video file is required".to_string(),
            ));
        }
        let stride = request.stride.unwrap_or(self.config.frame_stride);
        let started = Instant::now();
        let created_at = Local::now();
        let id = SessionId::generate_at(created_at);
        let workspace = create_session_workspace(&self.config.workspace_dir, id.as_str())?;

        let names = assign_names(&request.videos);
        let jobs: Vec<VideoJob> = request
            .videos
            .iter()
            .zip(names)
            .enumerate()
            .map(|(slot, (video, name))| {
                VideoJob::new(slot, video.clone(), name, request.preferences.clone(), stride)
            })
            .collect();

        let mut session = Session {
            id: id.clone(),
            created_at,
            state: SessionState::Open,
            preferences: request.preferences.clone(),
            stride,
            jobs: Vec::new(),
            archive: None,
            packaging_error: None,
        };
        let workers = self.config.worker_count.min(jobs.len()).max(1);
        info!(
            "Session {} opened with {} job(s) on {} worker(s)",
            id,
            jobs.len(),
            workers
        );
        reporter.batch_started(&BatchStartInfo {
            session_id: id.to_string(),
            videos: jobs.iter().map(|j| j.name.clone()).collect(),
            workers,
        });

        // ---- Dispatch ----
        let table = OutcomeTable::new(jobs.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("wildtrack-worker-{}", i))
            .build()
            .map_err(|e| CoreError::OperationFailed(format!("failed to build worker pool: {}", e)))?;
        let ctx = self.context();
        let workspace_path = workspace.path().to_path_buf();

        pool.install(|| {
            jobs.into_par_iter().for_each(|job| {
                let resolved = self.resolve_job(job, ctx, &workspace_path, abort);
                reporter.job_finished(&JobFinishedInfo {
                    slot: resolved.job.slot,
                    video_name: resolved.job.name.clone(),
                    detected: resolved.outcome.bundle().map(|b| b.summary.detected),
                    categories: resolved
                        .outcome
                        .bundle()
                        .map(|b| b.summary.categories.iter().cloned().collect())
                        .unwrap_or_default(),
                    error: resolved.outcome.failure().map(|f| f.reason.clone()),
                });
                if let Err(e) = table.record(resolved) {
                    error!("Session {}: {}", id, e);
                }
            });
        });

        // ---- Finalizing ----
        session.state = SessionState::Finalizing;
        session.jobs = table.into_resolved()?;
        info!("Session {} finalizing", id);

        if abort.is_aborted() {
            warn!("Session {} aborted before finalization; no archive built", id);
            reporter.warning("session aborted; no archive was built");
            session.state = SessionState::Failed;
        } else {
            match self.package(&session) {
                Ok(handle) => {
                    session.archive = Some(handle);
                    session.state = SessionState::Complete;
                }
                Err(e) => {
                    error!("Session {} failed during packaging: {}", id, e);
                    reporter.warning(&format!("packaging failed: {}", e));
                    session.state = SessionState::Failed;
                    session.packaging_error = Some(e.to_string());
                }
            }
        }

        drop(workspace);
        self.finish_report(&session, started, reporter);
        Ok(session)
    }

    fn resolve_job(
        &self,
        job: VideoJob,
        ctx: JobContext<'_, M, D>,
        workspace: &Path,
        abort: &AbortSignal,
    ) -> ResolvedJob {
        if abort.is_aborted() {
            let mut job = job;
            job.state = JobState::Failed;
            return ResolvedJob {
                job,
                outcome: JobOutcome::Failed(JobFailure::from(CoreError::Cancelled)),
            };
        }
        let job_dir = match create_job_dir(workspace, job.slot) {
            Ok(dir) => dir,
            Err(e) => {
                let mut job = job;
                job.state = JobState::Failed;
                return ResolvedJob {
                    job,
                    outcome: JobOutcome::Failed(JobFailure::new(FailureKind::Artifact, e.to_string())),
                };
            }
        };

        let fallback = job.clone();
        match catch_unwind(AssertUnwindSafe(|| run_job(job, ctx, &job_dir))) {
            Ok(resolved) => resolved,
            Err(payload) => {
                let reason = format!("job panicked: {}", panic_message(payload.as_ref()));
                error!("Job {} ({}): {}", fallback.slot, fallback.name, reason);
                let mut job = fallback;
                job.state = JobState::Failed;
                ResolvedJob {
                    job,
                    outcome: JobOutcome::Failed(JobFailure::new(FailureKind::Panic, reason)),
                }
            }
        }
    }

    fn package(&self, session: &Session) -> CoreResult<ArchiveHandle> {
        let wants_summary = session
            .jobs
            .iter()
            .any(|r| r.job.preferences.contains(Preference::KeepSummary));
        let exports = if wants_summary {
            Some(SummaryExports::render(&summary_table(&session.jobs))?)
        } else {
            None
        };

        let layout = plan_archive(&session.jobs, exports.as_ref());
        let bytes = write_archive(&layout)?;
        let manifest = SessionManifest {
            session_id: session.id.to_string(),
            created_at: session.created_at,
            state: SessionState::Complete,
            preferences: session.preferences.clone(),
            frame_stride: session.stride.get(),
            jobs: session.jobs.iter().map(ManifestJob::from_resolved).collect(),
            archive_size: 0,
            archive_sha256: String::new(),
        };
        self.store.persist(&session.id, &bytes, manifest)
    }

    fn finish_report(&self, session: &Session, started: Instant, reporter: &dyn SessionReporter) {
        let done = session.jobs.iter().filter(|r| r.outcome.is_done()).count();
        let detected = session
            .jobs
            .iter()
            .filter(|r| r.outcome.bundle().is_some_and(|b| b.summary.detected))
            .count();
        info!(
            "Session {} {}: {} done, {} failed",
            session.id,
            session.state,
            done,
            session.jobs.len() - done
        );
        reporter.session_finished(&SessionFinishedInfo {
            session_id: session.id.to_string(),
            state: session.state,
            done,
            failed: session.jobs.len() - done,
            detected,
            elapsed: started.elapsed(),
        });
    }

    /// Runs one video synchronously and returns its artifacts directly.
    ///
    /// Unsupported or undecodable input is rejected as an error here rather
    /// than recorded as data.
    pub fn process_single(&self, request: SingleVideoRequest) -> CoreResult<SingleVideoReport> {
        if !request.video.is_file() {
            return Err(CoreError::Validation(format!(
                "video file not found: {}",
                request.video.display()
            )));
        }
        if !self.config.is_supported_video(&request.video) {
            return Err(CoreError::Validation(format!(
                "unsupported file format: {} (expected {})",
                request.video.display(),
                self.config.supported_extensions.join(", ")
            )));
        }
        std::fs::create_dir_all(&request.output_dir)?;

        let name = assign_names(std::slice::from_ref(&request.video))
            .pop()
            .unwrap_or_else(|| "video".to_string());
        let stride = request.stride.unwrap_or(self.config.frame_stride);
        let mut job = VideoJob::new(0, request.video.clone(), name, request.preferences, stride);

        let bundle = execute_job(&mut job, self.context(), &request.output_dir)?;
        let status = if bundle.summary.detected {
            DetectionStatus::AnimalsDetected
        } else {
            DetectionStatus::NoAnimalsDetected
        };
        info!("{}: {}", job.name, status);

        Ok(SingleVideoReport {
            video_name: job.name,
            status: status.to_string(),
            message: status.message().to_string(),
            detected: bundle.summary.detected,
            summary: bundle.summary,
            artifacts: bundle
                .artifacts
                .into_iter()
                .map(|(kind, path)| (kind.key().to_string(), path))
                .collect(),
        })
    }

    /// Returns a previously built archive. Never triggers processing.
    pub fn fetch_archive(&self, session_id: &str) -> CoreResult<Vec<u8>> {
        self.store.open(session_id)
    }

    /// Returns the manifest of a previously built archive.
    pub fn session_status(&self, session_id: &str) -> CoreResult<SessionManifest> {
        self.store.manifest(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreferenceSet;

    fn resolved(slot: usize) -> ResolvedJob {
        ResolvedJob {
            job: VideoJob::new(slot, PathBuf::from("a.mp4"), "a.mp4".to_string(), PreferenceSet::new(), FrameStride::default()),
            outcome: JobOutcome::Failed(JobFailure::new(FailureKind::Decode, "x")),
        }
    }

    #[test]
    fn test_session_id_format_and_parsing() {
        let id = SessionId::generate();
        let (stamp, uuid) = id.as_str().split_once('_').unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(uuid.len(), 36);
        assert_eq!(SessionId::parse(id.as_str()).unwrap(), id);

        assert!(SessionId::parse("").is_err());
        assert!(SessionId::parse("../x").is_err());
        assert!(SessionId::parse("a/b").is_err());
    }

    #[test]
    fn test_outcome_table_is_write_once() {
        let table = OutcomeTable::new(2);
        table.record(resolved(1)).unwrap();
        assert!(table.record(resolved(1)).is_err());
        assert!(table.record(resolved(5)).is_err());
        table.record(resolved(0)).unwrap();

        let slots: Vec<usize> = table.into_resolved().unwrap().iter().map(|r| r.job.slot).collect();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn test_incomplete_table_cannot_be_consumed() {
        let table = OutcomeTable::new(2);
        table.record(resolved(0)).unwrap();
        assert!(table.into_resolved().is_err());
    }

    #[test]
    fn test_assign_names_disambiguates_duplicates() {
        let names = assign_names(&[
            PathBuf::from("/a/clip.mp4"),
            PathBuf::from("/b/clip.mp4"),
            PathBuf::from("/c/other.avi"),
            PathBuf::from("/d/clip.mp4"),
        ]);
        assert_eq!(names, vec!["clip.mp4", "clip_2.mp4", "other.avi", "clip_3.mp4"]);
    }

    #[test]
    fn test_assign_names_keeps_artifact_files_apart() {
        let names = assign_names(&[
            PathBuf::from("/a/clip.mp4"),
            PathBuf::from("/b/clip.avi"),
            PathBuf::from("/c/CLIP.MP4"),
            PathBuf::from("/d/clip_2.mp4"),
        ]);
        assert_eq!(names, vec!["clip.mp4", "clip_2.avi", "CLIP_3.MP4", "clip_2_2.mp4"]);

        let files: HashSet<String> = names.iter().flat_map(|n| artifact_file_names(n)).collect();
        assert_eq!(files.len(), names.len() * ArtifactKind::ALL.len());
    }

    #[test]
    fn test_abort_signal_is_shared_between_clones() {
        let signal = AbortSignal::new();
        let clone = signal.clone();
        assert!(!signal.is_aborted());
        clone.abort();
        assert!(signal.is_aborted());
    }

    #[test]
    fn test_detection_status_strings() {
        assert_eq!(DetectionStatus::AnimalsDetected.to_string(), "Animals detected");
        assert_eq!(DetectionStatus::NoAnimalsDetected.to_string(), "No animals detected");
    }
}
