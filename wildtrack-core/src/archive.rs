// ============================================================================
// wildtrack-core/src/archive.rs
// ============================================================================
//
// ARCHIVE PACKAGING: Deterministic Session Archives
//
// Packaging is split in three steps:
//   1. plan_archive: pure function from resolved jobs (+ optional summary
//      exports) to an ordered file tree. No file system access.
//   2. write_archive: renders a plan into zip bytes with fixed timestamps,
//      so equal plans with equal file contents give equal bytes.
//   3. ArchiveStore: persists the bytes and a manifest atomically, resolves
//      them by session id and evicts expired entries.
//
// KEY COMPONENTS:
// - ArchiveLayout / ArchiveEntry / EntrySource: the planned tree
// - SummaryExports: cross-video summary renderings placed at the root
// - ArchiveStore / ArchiveHandle / SessionManifest: persistence and lookup

// ---- External crate imports ----
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::export::SummaryTable;
use crate::model::{PreferenceSet, SessionState};
use crate::pipeline::{JobOutcome, ResolvedJob};
use crate::routing::{ArtifactKind, DestinationGroup};
use crate::session::SessionId;
use crate::temp_files::create_temp_file;

// ---- Standard library imports ----
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Root file name of the delimited cross-video summary.
pub const SUMMARY_CSV_NAME: &str = "overall_summary.csv";

/// Root file name of the spreadsheet cross-video summary.
pub const SUMMARY_XLSX_NAME: &str = "overall_summary.xlsx";

/// Archive-relative path of a job artifact.
pub fn archive_path(group: DestinationGroup, kind: ArtifactKind, video_name: &str) -> String {
    format!("{}/{}", group.dir_name(), kind.file_name(video_name))
}

/// Where an entry's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    File(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub source: EntrySource,
}

/// Ordered file tree of a session archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// Directory entries, always one per destination group.
    pub directories: Vec<String>,
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveLayout {
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }
}

/// Both renderings of the cross-video summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryExports {
    pub csv: String,
    pub xlsx: Vec<u8>,
}

impl SummaryExports {
    pub fn render(table: &SummaryTable) -> CoreResult<Self> {
        Ok(Self {
            csv: table.to_csv(),
            xlsx: table.to_xlsx()?,
        })
    }
}

/// Builds the summary table for `jobs`, one row per job in slot order.
pub fn summary_table(jobs: &[ResolvedJob]) -> SummaryTable {
    let mut ordered: Vec<&ResolvedJob> = jobs.iter().collect();
    ordered.sort_by_key(|r| r.job.slot);

    let mut table = SummaryTable::new();
    for resolved in ordered {
        match &resolved.outcome {
            JobOutcome::Done(bundle) => table.push_row(&bundle.summary),
            JobOutcome::Failed(failure) => table.push_failure(&resolved.job.name, &failure.reason),
        }
    }
    table
}

/// Plans the archive tree for a session.
///
/// Layout: summary exports at the root, then `animals_detected/` and
/// `no_animals_detected/`, each holding the materialised artifacts of its
/// jobs in slot order. Failed jobs contribute nothing but their summary row.
pub fn plan_archive(jobs: &[ResolvedJob], summary: Option<&SummaryExports>) -> ArchiveLayout {
    let mut entries = Vec::new();
    if let Some(exports) = summary {
        entries.push(ArchiveEntry {
            path: SUMMARY_CSV_NAME.to_string(),
            source: EntrySource::Bytes(exports.csv.clone().into_bytes()),
        });
        entries.push(ArchiveEntry {
            path: SUMMARY_XLSX_NAME.to_string(),
            source: EntrySource::Bytes(exports.xlsx.clone()),
        });
    }

    let mut ordered: Vec<&ResolvedJob> = jobs.iter().collect();
    ordered.sort_by_key(|r| r.job.slot);

    for group in DestinationGroup::ALL {
        for resolved in &ordered {
            let Some(bundle) = resolved.outcome.bundle() else {
                continue;
            };
            if bundle.routing.group != group {
                continue;
            }
            for (kind, path) in &bundle.artifacts {
                entries.push(ArchiveEntry {
                    path: archive_path(group, *kind, &resolved.job.name),
                    source: EntrySource::File(path.clone()),
                });
            }
        }
    }

    ArchiveLayout {
        directories: DestinationGroup::ALL
            .iter()
            .map(|g| format!("{}/", g.dir_name()))
            .collect(),
        entries,
    }
}

/// Renders a layout into zip bytes.
pub fn write_archive(layout: &ArchiveLayout) -> CoreResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);
    let dir_options = options.unix_permissions(0o755);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for directory in &layout.directories {
        writer.add_directory(directory.as_str(), dir_options)?;
    }
    for entry in &layout.entries {
        writer.start_file(entry.path.as_str(), options)?;
        match &entry.source {
            EntrySource::Bytes(bytes) => writer.write_all(bytes)?,
            EntrySource::File(path) => {
                let mut file = fs::File::open(path)?;
                std::io::copy(&mut file, &mut writer)?;
            }
        }
    }
    Ok(writer.finish()?.into_inner())
}

/// Outcome of one job as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestJob {
    pub video_name: String,
    pub detected: Option<bool>,
    pub group: Option<DestinationGroup>,
    pub artifacts: Vec<String>,
    pub error: Option<String>,
}

/// Persisted description of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionManifest {
    pub session_id: String,
    pub created_at: DateTime<Local>,
    pub state: SessionState,
    pub preferences: PreferenceSet,
    pub frame_stride: u32,
    pub jobs: Vec<ManifestJob>,
    pub archive_size: u64,
    pub archive_sha256: String,
}

impl ManifestJob {
    pub fn from_resolved(resolved: &ResolvedJob) -> Self {
        match &resolved.outcome {
            JobOutcome::Done(bundle) => ManifestJob {
                video_name: resolved.job.name.clone(),
                detected: Some(bundle.summary.detected),
                group: Some(bundle.routing.group),
                artifacts: bundle
                    .artifacts
                    .keys()
                    .map(|kind| archive_path(bundle.routing.group, *kind, &resolved.job.name))
                    .collect(),
                error: None,
            },
            JobOutcome::Failed(failure) => ManifestJob {
                video_name: resolved.job.name.clone(),
                detected: None,
                group: None,
                artifacts: Vec::new(),
                error: Some(failure.reason.clone()),
            },
        }
    }
}

/// Reference to a persisted archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveHandle {
    pub session_id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Directory of persisted archives keyed by session id.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
    ttl: Duration,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn archive_file(&self, id: &SessionId) -> PathBuf {
        self.root.join(format!("{}.zip", id))
    }

    fn manifest_file(&self, id: &SessionId) -> PathBuf {
        self.root.join(format!("{}_manifest.json", id))
    }

    /// Persists archive bytes and manifest. The archive only becomes
    /// visible once both are written; on failure neither remains.
    pub fn persist(&self, id: &SessionId, bytes: &[u8], mut manifest: SessionManifest) -> CoreResult<ArchiveHandle> {
        let sha256 = format!("{:x}", Sha256::digest(bytes));
        manifest.archive_size = bytes.len() as u64;
        manifest.archive_sha256 = sha256.clone();

        let manifest_path = self.manifest_file(id);
        let archive_path = self.archive_file(id);

        let mut manifest_tmp = create_temp_file(&self.root, "manifest", "json")?;
        serde_json::to_writer_pretty(manifest_tmp.as_file_mut(), &manifest)?;
        manifest_tmp.as_file_mut().sync_all()?;
        manifest_tmp
            .persist(&manifest_path)
            .map_err(|e| CoreError::Io(e.error))?;

        let written = (|| -> CoreResult<()> {
            let mut archive_tmp = create_temp_file(&self.root, "archive", "zip")?;
            archive_tmp.write_all(bytes)?;
            archive_tmp.as_file_mut().sync_all()?;
            archive_tmp
                .persist(&archive_path)
                .map_err(|e| CoreError::Io(e.error))?;
            Ok(())
        })();
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&manifest_path) {
                warn!("Failed to remove manifest {}: {}", manifest_path.display(), cleanup);
            }
            return Err(e);
        }

        info!("Archived session {} ({} bytes)", id, bytes.len());
        Ok(ArchiveHandle {
            session_id: id.to_string(),
            path: archive_path,
            size_bytes: bytes.len() as u64,
            sha256,
        })
    }

    fn is_expired(&self, path: &Path) -> CoreResult<bool> {
        let modified = fs::metadata(path)?.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Ok(age > self.ttl)
    }

    /// Resolves a session id to its archive path, evicting it when expired.
    fn resolve(&self, session_id: &str) -> CoreResult<SessionId> {
        let not_found = || CoreError::NotFound(session_id.to_string());
        let id = SessionId::parse(session_id).map_err(|_| not_found())?;
        let archive = self.archive_file(&id);
        if !archive.is_file() {
            return Err(not_found());
        }
        if self.is_expired(&archive)? {
            self.remove(&id);
            return Err(not_found());
        }
        Ok(id)
    }

    /// Returns the archive bytes for `session_id` exactly as persisted.
    pub fn open(&self, session_id: &str) -> CoreResult<Vec<u8>> {
        let id = self.resolve(session_id)?;
        debug!("Serving archive for session {}", id);
        Ok(fs::read(self.archive_file(&id))?)
    }

    /// Returns the manifest for `session_id`.
    pub fn manifest(&self, session_id: &str) -> CoreResult<SessionManifest> {
        let id = self.resolve(session_id)?;
        let file = fs::File::open(self.manifest_file(&id))
            .map_err(|_| CoreError::NotFound(session_id.to_string()))?;
        Ok(serde_json::from_reader(file)?)
    }

    fn remove(&self, id: &SessionId) {
        for path in [self.archive_file(id), self.manifest_file(id)] {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }

    /// Removes every expired archive. Returns how many were evicted.
    pub fn evict_expired(&self) -> CoreResult<usize> {
        if !self.root.is_dir() {
            return Ok(0);
        }
        let mut evicted = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| SessionId::parse(s).ok())
            else {
                continue;
            };
            if self.is_expired(&path)? {
                info!("Evicting expired archive for session {}", id);
                self.remove(&id);
                evicted += 1;
            }
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameStride, SummaryRow};
    use crate::pipeline::{FailureKind, JobFailure, ResultBundle, VideoJob};
    use crate::routing::RoutingDecision;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn done(slot: usize, name: &str, detected: bool, artifacts: &[(ArtifactKind, &Path)]) -> ResolvedJob {
        let group = DestinationGroup::for_detected(detected);
        let mut summary = SummaryRow::empty(name);
        summary.detected = detected;
        ResolvedJob {
            job: VideoJob::new(slot, PathBuf::from(name), name.to_string(), PreferenceSet::new(), FrameStride::default()),
            outcome: JobOutcome::Done(ResultBundle {
                summary,
                tracks: Vec::new(),
                frames_read: 0,
                detections: 0,
                routing: RoutingDecision {
                    group,
                    artifacts: artifacts.iter().map(|(k, _)| *k).collect(),
                },
                artifacts: artifacts
                    .iter()
                    .map(|(k, p)| (*k, p.to_path_buf()))
                    .collect::<BTreeMap<_, _>>(),
            }),
        }
    }

    fn failed(slot: usize, name: &str) -> ResolvedJob {
        ResolvedJob {
            job: VideoJob::new(slot, PathBuf::from(name), name.to_string(), PreferenceSet::new(), FrameStride::default()),
            outcome: JobOutcome::Failed(JobFailure::new(FailureKind::Decode, "corrupt")),
        }
    }

    fn sample_exports() -> SummaryExports {
        SummaryExports {
            csv: "Video Name\n".to_string(),
            xlsx: b"xlsx".to_vec(),
        }
    }

    #[test]
    fn test_plan_orders_root_then_groups_then_slots() {
        let csv = Path::new("/w/x.csv");
        let jobs = vec![
            done(2, "c.mp4", true, &[(ArtifactKind::DetailedResults, csv)]),
            failed(1, "b.mp4"),
            done(0, "a.mp4", false, &[(ArtifactKind::VideoSummary, csv)]),
            done(3, "d.mp4", true, &[(ArtifactKind::AnnotatedVideo, csv), (ArtifactKind::DetailedResults, csv)]),
        ];
        let layout = plan_archive(&jobs, Some(&sample_exports()));

        assert_eq!(
            layout.paths(),
            vec![
                "overall_summary.csv",
                "overall_summary.xlsx",
                "animals_detected/c_detections.csv",
                "animals_detected/d_annotated.mp4",
                "animals_detected/d_detections.csv",
                "no_animals_detected/a_summary.txt",
            ]
        );
        assert_eq!(layout.directories, vec!["animals_detected/", "no_animals_detected/"]);
    }

    #[test]
    fn test_plan_is_independent_of_completion_order() {
        let p = Path::new("/w/f");
        let mut jobs = vec![
            done(0, "a.mp4", true, &[(ArtifactKind::DetailedResults, p)]),
            done(1, "b.mp4", true, &[(ArtifactKind::DetailedResults, p)]),
        ];
        let forward = plan_archive(&jobs, None);
        jobs.reverse();
        assert_eq!(plan_archive(&jobs, None), forward);
    }

    #[test]
    fn test_summary_table_keeps_slot_order_and_flags_failures() {
        let jobs = vec![failed(1, "b.mp4"), done(0, "a.mp4", false, &[])];
        let table = summary_table(&jobs);
        assert_eq!(table.video_names(), vec!["a.mp4", "b.mp4"]);
        assert!(table.to_csv().contains("b.mp4,Failed,,,corrupt"));
    }

    #[test]
    fn test_write_archive_is_deterministic() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip_summary.txt");
        fs::write(&file, "deer: Detected with Track ID: 1\n").unwrap();
        let jobs = vec![done(0, "clip.mp4", true, &[(ArtifactKind::VideoSummary, file.as_path())])];
        let layout = plan_archive(&jobs, Some(&sample_exports()));

        let first = write_archive(&layout).unwrap();
        let second = write_archive(&layout).unwrap();
        assert_eq!(first, second);

        let mut zip = zip::ZipArchive::new(Cursor::new(first)).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert!(names.contains(&"animals_detected/".to_string()));
        assert!(names.contains(&"no_animals_detected/".to_string()));
        let mut contents = String::new();
        std::io::Read::read_to_string(&mut zip.by_name("animals_detected/clip_summary.txt").unwrap(), &mut contents).unwrap();
        assert!(contents.starts_with("deer"));
    }

    #[test]
    fn test_write_archive_fails_on_missing_artifact() {
        let jobs = vec![done(0, "clip.mp4", true, &[(ArtifactKind::DetailedResults, Path::new("/nonexistent/x.csv"))])];
        assert!(write_archive(&plan_archive(&jobs, None)).is_err());
    }

    fn manifest(id: &SessionId) -> SessionManifest {
        SessionManifest {
            session_id: id.to_string(),
            created_at: Local::now(),
            state: SessionState::Complete,
            preferences: PreferenceSet::new(),
            frame_stride: 3,
            jobs: Vec::new(),
            archive_size: 0,
            archive_sha256: String::new(),
        }
    }

    #[test]
    fn test_store_round_trip_and_not_found() {
        let dir = tempdir().unwrap();
        let store = ArchiveStore::new(dir.path(), Duration::from_secs(60));
        let id = SessionId::generate();

        let handle = store.persist(&id, b"PK-bytes", manifest(&id)).unwrap();
        assert_eq!(handle.size_bytes, 8);
        assert_eq!(store.open(&id.to_string()).unwrap(), b"PK-bytes");
        assert_eq!(store.open(&id.to_string()).unwrap(), b"PK-bytes");
        assert_eq!(store.manifest(&id.to_string()).unwrap().archive_sha256, handle.sha256);

        assert!(matches!(store.open("20200101000000_unknown"), Err(CoreError::NotFound(_))));
        assert!(matches!(store.open("../../etc/passwd"), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_expired_archives_are_evicted() {
        let dir = tempdir().unwrap();
        let store = ArchiveStore::new(dir.path(), Duration::from_millis(10));
        let first = SessionId::generate();
        let second = SessionId::generate();
        store.persist(&first, b"one", manifest(&first)).unwrap();
        store.persist(&second, b"two", manifest(&second)).unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert!(matches!(store.open(&first.to_string()), Err(CoreError::NotFound(_))));
        assert!(!dir.path().join(format!("{}.zip", first)).exists());

        assert_eq!(store.evict_expired().unwrap(), 1);
        assert!(matches!(store.manifest(&second.to_string()), Err(CoreError::NotFound(_))));
    }
}
