//! Per-video renderings: the detailed detection record and summary text.

use crate::aggregation::VideoAggregate;
use crate::model::Detection;

use super::build_csv;

/// Column order of the detailed detection record.
pub const DETAILED_COLUMNS: [&str; 9] = [
    "Frame",
    "Timestamp (s)",
    "Track ID",
    "Animal",
    "Confidence",
    "Center X",
    "Center Y",
    "Width",
    "Height",
];

/// One row per detection, in arrival order.
pub fn render_detailed_csv(detections: &[Detection]) -> String {
    build_csv(
        &DETAILED_COLUMNS,
        detections.iter().map(|d| {
            vec![
                d.frame_index.to_string(),
                format!("{:.3}", d.timestamp_secs),
                d.track_id.to_string(),
                d.label.clone(),
                format!("{:.4}", d.confidence),
                format!("{:.1}", d.bbox.cx),
                format!("{:.1}", d.bbox.cy),
                format!("{:.1}", d.bbox.width),
                format!("{:.1}", d.bbox.height),
            ]
        }),
    )
}

/// Human readable list of the tracks found in one video.
pub fn render_video_summary(aggregate: &VideoAggregate) -> String {
    if aggregate.tracks.is_empty() {
        return "No identifiable wildlife species were detected in the video.\n".to_string();
    }
    aggregate
        .tracks
        .iter()
        .map(|t| format!("{}: Detected with Track ID: {}\n", t.label, t.track_id))
        .collect()
}
