// ============================================================================
// wildtrack-core/src/detection/mod.rs
// ============================================================================
//
// DETECTION ADAPTER: Boundary to the External Detector/Tracker
//
// The detector itself is a replaceable black box. The core only relies on
// the contract expressed by the `Detector` trait: synchronous per-frame
// calls that keep track-id continuity within one video, plus a reset. A
// `DetectorFactory` hands out one instance per job so tracking state never
// leaks between videos or between concurrently running jobs.
//
// KEY COMPONENTS:
// - Detector / DetectorFactory: capability traits
// - DetectionFailure: error raised by adapters
// - label_objects: turns tracker output into labelled Detections
// - ProcessDetector: adapter speaking JSON lines to an external command

pub mod process;

// ---- External crate imports ----
use log::debug;
use thiserror::Error;

// ---- Internal crate imports ----
use crate::config::ClassLabels;
use crate::model::{Detection, TrackedObject};
use crate::sampling::Frame;

pub use process::{ProcessDetector, ProcessDetectorFactory};

/// Error raised by a detector adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DetectionFailure(pub String);

impl DetectionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        DetectionFailure(reason.into())
    }
}

/// Per-video detector/tracker.
///
/// Only sampled frames are passed in, in strictly increasing index order.
pub trait Detector {
    /// Detects and tracks objects on one frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<TrackedObject>, DetectionFailure>;

    /// Drops all tracking state so the next call starts a new video.
    fn reset(&mut self) -> Result<(), DetectionFailure>;
}

/// Creates independent detector instances, one per job.
pub trait DetectorFactory: Send + Sync {
    type Detector: Detector;

    fn create(&self) -> Result<Self::Detector, DetectionFailure>;
}

/// Converts tracker output for `frame` into labelled detections.
///
/// Objects the tracker has not assigned an id to are dropped; they cannot
/// contribute to a track.
pub fn label_objects(frame: &Frame, objects: Vec<TrackedObject>, labels: &ClassLabels) -> Vec<Detection> {
    let total = objects.len();
    let detections: Vec<Detection> = objects
        .into_iter()
        .filter_map(|object| {
            let track_id = object.track_id?;
            Some(Detection {
                frame_index: frame.index,
                timestamp_secs: frame.timestamp_secs,
                bbox: object.bbox,
                label: labels.label_for(object.class_id).to_string(),
                confidence: object.confidence,
                track_id,
            })
        })
        .collect();

    if detections.len() < total {
        debug!(
            "Frame {}: skipped {} untracked object(s)",
            frame.index,
            total - detections.len()
        );
    }
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;
    use crate::sampling::RawFrame;

    #[test]
    fn test_label_objects_maps_classes_and_drops_untracked() {
        let frame = Frame {
            index: 6,
            timestamp_secs: 0.2,
            sampled: true,
            image: RawFrame::blank(1, 1),
        };
        let objects = vec![
            TrackedObject {
                track_id: Some(4),
                class_id: 1,
                confidence: 0.9,
                bbox: BoundingBox::new(1.0, 1.0, 2.0, 2.0),
            },
            TrackedObject {
                track_id: None,
                class_id: 0,
                confidence: 0.8,
                bbox: BoundingBox::new(1.0, 1.0, 2.0, 2.0),
            },
            TrackedObject {
                track_id: Some(5),
                class_id: 99,
                confidence: 0.7,
                bbox: BoundingBox::new(1.0, 1.0, 2.0, 2.0),
            },
        ];

        let detections = label_objects(&frame, objects, &ClassLabels::default());
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].label, "deer");
        assert_eq!(detections[0].frame_index, 6);
        assert_eq!(detections[1].label, "Unknown");
        assert_eq!(detections[1].track_id, 5);
    }
}
