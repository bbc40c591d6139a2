//! Output classification.
//!
//! Decides, per job, which destination group its outputs belong to and which
//! artifacts actually materialise: the intersection of what was requested
//! and what the job produced. No file I/O happens here.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::path::Path;

use crate::model::{Preference, PreferenceSet};

/// Archive subdirectory a job's artifacts are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationGroup {
    Detected,
    NotDetected,
}

impl DestinationGroup {
    pub const ALL: [DestinationGroup; 2] = [DestinationGroup::Detected, DestinationGroup::NotDetected];

    pub fn for_detected(detected: bool) -> Self {
        if detected {
            DestinationGroup::Detected
        } else {
            DestinationGroup::NotDetected
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            DestinationGroup::Detected => "animals_detected",
            DestinationGroup::NotDetected => "no_animals_detected",
        }
    }
}

impl fmt::Display for DestinationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A per-video output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    AnnotatedVideo,
    DetailedResults,
    VideoSummary,
    OriginalVideo,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::AnnotatedVideo,
        ArtifactKind::DetailedResults,
        ArtifactKind::VideoSummary,
        ArtifactKind::OriginalVideo,
    ];

    /// Preference flag that gates this artifact.
    pub fn preference(&self) -> Preference {
        match self {
            ArtifactKind::AnnotatedVideo => Preference::GenerateAnnotatedVideo,
            ArtifactKind::DetailedResults => Preference::KeepDetailedResults,
            ArtifactKind::VideoSummary => Preference::KeepSummary,
            ArtifactKind::OriginalVideo => Preference::KeepOriginal,
        }
    }

    /// Name used in artifact maps.
    pub fn key(&self) -> &'static str {
        match self {
            ArtifactKind::AnnotatedVideo => "annotated_video",
            ArtifactKind::DetailedResults => "detailed_results",
            ArtifactKind::VideoSummary => "summary",
            ArtifactKind::OriginalVideo => "original_video",
        }
    }

    /// File name of this artifact for a video called `video_name`.
    pub fn file_name(&self, video_name: &str) -> String {
        let stem = Path::new(video_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(video_name);
        match self {
            ArtifactKind::AnnotatedVideo => format!("{}_annotated.mp4", stem),
            ArtifactKind::DetailedResults => format!("{}_detections.csv", stem),
            ArtifactKind::VideoSummary => format!("{}_summary.txt", stem),
            ArtifactKind::OriginalVideo => video_name.to_string(),
        }
    }
}

/// Where a job's outputs go and which of them exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub group: DestinationGroup,
    /// Materialised artifacts in canonical order.
    pub artifacts: Vec<ArtifactKind>,
}

/// Routes a finished job.
pub fn route<I>(detected: bool, produced: I, preferences: &PreferenceSet) -> RoutingDecision
where
    I: IntoIterator<Item = ArtifactKind>,
{
    let produced: Vec<ArtifactKind> = produced.into_iter().collect();
    let artifacts = ArtifactKind::ALL
        .into_iter()
        .filter(|kind| produced.contains(kind) && preferences.contains(kind.preference()))
        .collect();
    RoutingDecision {
        group: DestinationGroup::for_detected(detected),
        artifacts,
    }
}
