//! Shared data model: preferences, stride, detections, tracks and the states
//! a job or session moves through.

use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// An optional artifact a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    KeepSummary,
    GenerateAnnotatedVideo,
    KeepDetailedResults,
    KeepOriginal,
}

impl Preference {
    pub const ALL: [Preference; 4] = [
        Preference::KeepSummary,
        Preference::GenerateAnnotatedVideo,
        Preference::KeepDetailedResults,
        Preference::KeepOriginal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::KeepSummary => "keep_summary",
            Preference::GenerateAnnotatedVideo => "generate_annotated_video",
            Preference::KeepDetailedResults => "keep_detailed_results",
            Preference::KeepOriginal => "keep_original",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown preference '{}'", s)))
    }
}

/// The subset of optional artifacts requested for a job.
///
/// Parsed from a comma-separated list such as
/// `keep_summary,generate_annotated_video`. Blank entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet(BTreeSet<Preference>);

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, preference: Preference) -> Self {
        self.0.insert(preference);
        self
    }

    pub fn without(mut self, preference: Preference) -> Self {
        self.0.remove(&preference);
        self
    }

    pub fn contains(&self, preference: Preference) -> bool {
        self.0.contains(&preference)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Preference> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Preference> for PreferenceSet {
    fn from_iter<I: IntoIterator<Item = Preference>>(iter: I) -> Self {
        PreferenceSet(iter.into_iter().collect())
    }
}

impl FromStr for PreferenceSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Preference::from_str)
            .collect()
    }
}

impl fmt::Display for PreferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Preference::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// Sampling interval: every Nth frame is forwarded to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct FrameStride(NonZeroU32);

impl FrameStride {
    /// Validates a caller-supplied stride. Anything below 1 is rejected.
    pub fn new(value: i64) -> CoreResult<Self> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(FrameStride)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "frame stride must be a positive integer, got {}",
                    value
                ))
            })
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Whether the frame at `index` is forwarded for detection.
    pub fn samples(&self, index: u64) -> bool {
        index % u64::from(self.get()) == 0
    }
}

impl Default for FrameStride {
    fn default() -> Self {
        FrameStride(NonZeroU32::MIN.saturating_add(2))
    }
}

impl TryFrom<i64> for FrameStride {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        FrameStride::new(value)
    }
}

impl From<FrameStride> for u32 {
    fn from(stride: FrameStride) -> Self {
        stride.get()
    }
}

impl fmt::Display for FrameStride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Axis-aligned box in pixels, stored as center point plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self { cx, cy, width, height }
    }

    /// Top-left and bottom-right corners.
    pub fn corners(&self) -> (f32, f32, f32, f32) {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        (
            self.cx - half_w,
            self.cy - half_h,
            self.cx + half_w,
            self.cy + half_h,
        )
    }
}

/// One object as reported by the external detector/tracker for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// Absent when the tracker could not associate the object yet.
    pub track_id: Option<u64>,
    pub class_id: u32,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// A labelled, tracked detection on a specific frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub frame_index: u64,
    pub timestamp_secs: f64,
    pub bbox: BoundingBox,
    pub label: String,
    pub confidence: f32,
    pub track_id: u64,
}

/// One individual followed across frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: u64,
    /// Majority label across the track's detections.
    pub label: String,
    pub first_frame: u64,
    pub last_frame: u64,
    pub max_confidence: f32,
    pub detections: usize,
}

/// Per-video result row used by the cross-video summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub video_name: String,
    pub detected: bool,
    pub categories: BTreeSet<String>,
    pub counts: BTreeMap<String, usize>,
}

impl SummaryRow {
    pub fn empty(video_name: impl Into<String>) -> Self {
        Self {
            video_name: video_name.into(),
            detected: false,
            categories: BTreeSet::new(),
            counts: BTreeMap::new(),
        }
    }
}

/// Lifecycle of a single video job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Sampling,
    Detecting,
    Aggregating,
    Done,
    Failed,
}

/// Lifecycle of a batch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Open,
    Finalizing,
    Complete,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Open => "open",
            SessionState::Finalizing => "finalizing",
            SessionState::Complete => "complete",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_rejects_non_positive_values() {
        assert!(matches!(FrameStride::new(0), Err(CoreError::Validation(_))));
        assert!(matches!(FrameStride::new(-4), Err(CoreError::Validation(_))));
        assert_eq!(FrameStride::new(1).unwrap().get(), 1);
        assert_eq!(FrameStride::default().get(), 3);
    }

    #[test]
    fn test_stride_sampling_includes_frame_zero() {
        let stride = FrameStride::new(3).unwrap();
        let sampled: Vec<u64> = (0..10).filter(|i| stride.samples(*i)).collect();
        assert_eq!(sampled, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_preference_set_parsing() {
        let prefs: PreferenceSet = " keep_summary, generate_annotated_video ,,".parse().unwrap();
        assert!(prefs.contains(Preference::KeepSummary));
        assert!(prefs.contains(Preference::GenerateAnnotatedVideo));
        assert!(!prefs.contains(Preference::KeepDetailedResults));
        assert_eq!(prefs.to_string(), "keep_summary,generate_annotated_video");

        assert!("".parse::<PreferenceSet>().unwrap().is_empty());
        assert!("keep_everything".parse::<PreferenceSet>().is_err());
    }

    #[test]
    fn test_bounding_box_corners() {
        let bbox = BoundingBox::new(50.0, 40.0, 20.0, 10.0);
        assert_eq!(bbox.corners(), (40.0, 35.0, 60.0, 45.0));
    }
}
