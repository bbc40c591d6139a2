// ============================================================================
// wildtrack-core/src/aggregation.rs
// ============================================================================
//
// TRACK AGGREGATION: Folding Frame Detections into Tracks
//
// Consumes the ordered detection stream of one video and builds one Track
// per tracker id. Each track keeps a vote tally of the labels it was seen
// with; at the end of the stream the majority label wins, with ties going to
// the label that was seen first. The aggregator does no I/O, so replaying the
// same stream always produces the same tracks and summary row.
//
// KEY COMPONENTS:
// - TrackAggregator: incremental builder
// - VideoAggregate: resolved tracks plus the summary row
// - aggregate: one-shot helper over a slice of detections

// ---- External crate imports ----
use serde::Serialize;

// ---- Internal crate imports ----
use crate::model::{Detection, SummaryRow, Track};

// ---- Standard library imports ----
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct TrackBuilder {
    track_id: u64,
    first_frame: u64,
    last_frame: u64,
    max_confidence: f32,
    detections: usize,
    /// Label tallies in first-seen order.
    votes: Vec<(String, usize)>,
}

impl TrackBuilder {
    fn start(detection: &Detection) -> Self {
        Self {
            track_id: detection.track_id,
            first_frame: detection.frame_index,
            last_frame: detection.frame_index,
            max_confidence: detection.confidence,
            detections: 1,
            votes: vec![(detection.label.clone(), 1)],
        }
    }

    fn extend(&mut self, detection: &Detection) {
        self.last_frame = self.last_frame.max(detection.frame_index);
        self.first_frame = self.first_frame.min(detection.frame_index);
        if detection.confidence > self.max_confidence {
            self.max_confidence = detection.confidence;
        }
        self.detections += 1;
        match self.votes.iter_mut().find(|(label, _)| *label == detection.label) {
            Some((_, count)) => *count += 1,
            None => self.votes.push((detection.label.clone(), 1)),
        }
    }

    fn majority_label(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for vote in &self.votes {
            if best.is_none_or(|b| vote.1 > b.1) {
                best = Some(vote);
            }
        }
        best.map(|(label, _)| label.as_str()).unwrap_or_default()
    }

    fn resolve(&self) -> Track {
        Track {
            track_id: self.track_id,
            label: self.majority_label().to_string(),
            first_frame: self.first_frame,
            last_frame: self.last_frame,
            max_confidence: self.max_confidence,
            detections: self.detections,
        }
    }
}

/// Resolved per-video aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoAggregate {
    /// Tracks in order of first appearance.
    pub tracks: Vec<Track>,
    pub summary: SummaryRow,
}

impl VideoAggregate {
    pub fn detected(&self) -> bool {
        self.summary.detected
    }
}

/// Incremental track builder for one video.
#[derive(Debug, Clone, Default)]
pub struct TrackAggregator {
    builders: Vec<TrackBuilder>,
    index_by_id: HashMap<u64, usize>,
}

impl TrackAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one detection. Detections must arrive in frame order.
    pub fn ingest(&mut self, detection: &Detection) {
        match self.index_by_id.get(&detection.track_id) {
            Some(&slot) => self.builders[slot].extend(detection),
            None => {
                self.index_by_id
                    .insert(detection.track_id, self.builders.len());
                self.builders.push(TrackBuilder::start(detection));
            }
        }
    }

    /// Resolves majority labels and builds the summary row.
    pub fn finish(&self, video_name: &str) -> VideoAggregate {
        let tracks: Vec<Track> = self.builders.iter().map(TrackBuilder::resolve).collect();

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for track in &tracks {
            *counts.entry(track.label.clone()).or_insert(0) += 1;
        }
        let categories: BTreeSet<String> = counts.keys().cloned().collect();

        VideoAggregate {
            summary: SummaryRow {
                video_name: video_name.to_string(),
                detected: !tracks.is_empty(),
                categories,
                counts,
            },
            tracks,
        }
    }
}

/// Aggregates a complete detection stream in one call.
pub fn aggregate<'a, I>(video_name: &str, detections: I) -> VideoAggregate
where
    I: IntoIterator<Item = &'a Detection>,
{
    let mut aggregator = TrackAggregator::new();
    for detection in detections {
        aggregator.ingest(detection);
    }
    aggregator.finish(video_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn det(frame: u64, track: u64, label: &str, confidence: f32) -> Detection {
        Detection {
            frame_index: frame,
            timestamp_secs: frame as f64 / 30.0,
            bbox: BoundingBox::new(10.0, 10.0, 5.0, 5.0),
            label: label.to_string(),
            confidence,
            track_id: track,
        }
    }

    #[test]
    fn test_single_track_spanning_frames_two_to_seven() {
        let stream: Vec<Detection> = (2..=7).map(|f| det(f, 1, "deer", 0.8)).collect();
        let result = aggregate("clip.mp4", &stream);

        assert_eq!(result.tracks.len(), 1);
        assert_eq!(result.tracks[0].first_frame, 2);
        assert_eq!(result.tracks[0].last_frame, 7);
        assert_eq!(result.tracks[0].detections, 6);
        assert!(result.summary.detected);
        assert_eq!(result.summary.counts.len(), 1);
        assert_eq!(result.summary.counts["deer"], 1);
    }

    #[test]
    fn test_majority_vote_and_tie_break() {
        let stream = vec![
            det(0, 1, "coyote", 0.6),
            det(1, 1, "deer", 0.9),
            det(2, 1, "deer", 0.7),
            det(0, 2, "raccoon", 0.5),
            det(1, 2, "turkey", 0.5),
        ];
        let result = aggregate("v", &stream);

        assert_eq!(result.tracks[0].label, "deer");
        assert_eq!(result.tracks[0].max_confidence, 0.9);
        // Tie between raccoon and turkey goes to the first label seen.
        assert_eq!(result.tracks[1].label, "raccoon");
        assert_eq!(
            result.summary.categories.iter().cloned().collect::<Vec<_>>(),
            vec!["deer".to_string(), "raccoon".to_string()]
        );
    }

    #[test]
    fn test_counts_are_per_track_not_per_detection() {
        let stream = vec![
            det(0, 1, "deer", 0.8),
            det(3, 1, "deer", 0.8),
            det(3, 2, "deer", 0.8),
            det(6, 3, "coyote", 0.8),
        ];
        let result = aggregate("v", &stream);
        assert_eq!(result.summary.counts["deer"], 2);
        assert_eq!(result.summary.counts["coyote"], 1);
    }

    #[test]
    fn test_empty_stream_is_not_detected() {
        let result = aggregate("empty.mp4", &[]);
        assert!(result.tracks.is_empty());
        assert!(!result.detected());
        assert!(result.summary.categories.is_empty());
    }

    #[test]
    fn test_replay_is_idempotent() {
        let stream = vec![
            det(0, 7, "turkey", 0.8),
            det(3, 8, "deer", 0.85),
            det(6, 7, "coyote", 0.95),
            det(9, 7, "turkey", 0.75),
        ];
        let first = aggregate("v", &stream);
        let second = aggregate("v", &stream);
        assert_eq!(first, second);

        let mut incremental = TrackAggregator::new();
        stream.iter().for_each(|d| incremental.ingest(d));
        assert_eq!(incremental.finish("v"), first);
        assert_eq!(incremental.finish("v"), first);
    }
}
