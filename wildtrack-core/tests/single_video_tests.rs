// wildtrack-core/tests/single_video_tests.rs

mod common;

use common::*;
use tempfile::tempdir;
use wildtrack_core::{CoreError, FrameStride, PreferenceSet, SingleVideoRequest};

fn request(video: std::path::PathBuf, output_dir: std::path::PathBuf, prefs: &str) -> SingleVideoRequest {
    SingleVideoRequest {
        video,
        preferences: prefs.parse::<PreferenceSet>().unwrap(),
        stride: None,
        output_dir,
    }
}

#[test]
fn test_video_without_animals_reports_no_detection() {
    let dir = tempdir().unwrap();
    let video = write_video(dir.path(), "quiet.mp4", "frames=12");
    let out = dir.path().join("out");
    let coordinator = coordinator(dir.path(), 1);

    let report = coordinator
        .process_single(request(video, out.clone(), "keep_detailed_results"))
        .unwrap();

    assert_eq!(report.status, "No animals detected");
    assert_eq!(report.message, "No animals detected in the uploaded video.");
    assert!(!report.detected);
    assert!(report.summary.categories.is_empty());

    let csv = std::fs::read_to_string(&report.artifacts["detailed_results"]).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("Frame,"));
}

#[test]
fn test_detected_video_writes_requested_artifacts() {
    let dir = tempdir().unwrap();
    let video = write_video(dir.path(), "trail.mp4", "frames=10\n7:3@1-9\n8:1@4-4");
    let out = dir.path().join("out");
    let coordinator = coordinator(dir.path(), 1);

    let report = coordinator
        .process_single(request(
            video,
            out.clone(),
            "keep_summary,keep_detailed_results,generate_annotated_video",
        ))
        .unwrap();

    assert_eq!(report.status, "Animals detected");
    assert_eq!(
        report.message,
        "The uploaded video contains identifiable wildlife species."
    );
    assert_eq!(report.summary.counts.get("turkey"), Some(&1));
    assert!(!report.summary.categories.contains("deer"));

    assert_eq!(report.artifacts["annotated_video"], out.join("trail_annotated.mp4"));
    let annotated = std::fs::metadata(&report.artifacts["annotated_video"]).unwrap();
    assert_eq!(annotated.len(), 10 * 8 * 8 * 3);

    let summary = std::fs::read_to_string(&report.artifacts["summary"]).unwrap();
    assert_eq!(summary, "turkey: Detected with Track ID: 7\n");

    let csv = std::fs::read_to_string(&report.artifacts["detailed_results"]).unwrap();
    assert_eq!(csv.lines().count(), 1 + 3);
}

#[test]
fn test_zero_frame_video_produces_no_annotated_copy() {
    let dir = tempdir().unwrap();
    let video = write_video(dir.path(), "blank.mp4", "frames=0");
    let coordinator = coordinator(dir.path(), 1);

    let report = coordinator
        .process_single(request(video, dir.path().join("out"), "generate_annotated_video"))
        .unwrap();

    assert!(!report.detected);
    assert!(!report.artifacts.contains_key("annotated_video"));
}

#[test]
fn test_annotated_copy_uses_decoded_frame_size() {
    let dir = tempdir().unwrap();
    let video = write_video(dir.path(), "portrait.mp4", "frames=4\nrotated\n3:2@0-3");
    let coordinator = coordinator(dir.path(), 1);

    let report = coordinator
        .process_single(request(video, dir.path().join("out"), "generate_annotated_video"))
        .unwrap();

    assert!(report.detected);
    let annotated = std::fs::metadata(&report.artifacts["annotated_video"]).unwrap();
    assert_eq!(annotated.len(), 4 * 8 * 8 * 3);
}

#[test]
fn test_stride_overrides_configured_default() {
    let dir = tempdir().unwrap();
    // Only frame 5 shows the animal: stride 5 samples it, the default 3 does not.
    let video = write_video(dir.path(), "glimpse.mp4", "frames=8\n1:1@5-5");
    let coordinator = coordinator(dir.path(), 1);

    let default = coordinator
        .process_single(request(video.clone(), dir.path().join("a"), ""))
        .unwrap();
    assert!(!default.detected);

    let mut custom = request(video, dir.path().join("b"), "");
    custom.stride = Some(FrameStride::new(5).unwrap());
    assert!(coordinator.process_single(custom).unwrap().detected);
}

#[test]
fn test_invalid_stride_is_rejected() {
    assert!(matches!(FrameStride::new(0), Err(CoreError::Validation(_))));
    assert!(matches!(FrameStride::new(-3), Err(CoreError::Validation(_))));
    assert_eq!(FrameStride::new(1).unwrap().get(), 1);
}

#[test]
fn test_unsupported_and_missing_inputs_are_request_errors() {
    let dir = tempdir().unwrap();
    let coordinator = coordinator(dir.path(), 1);

    let mov = write_video(dir.path(), "clip.mov", "frames=3");
    assert!(matches!(
        coordinator.process_single(request(mov, dir.path().join("out"), "")),
        Err(CoreError::Validation(_))
    ));

    let missing = dir.path().join("missing.mp4");
    assert!(matches!(
        coordinator.process_single(request(missing, dir.path().join("out"), "")),
        Err(CoreError::Validation(_))
    ));

    let corrupt = write_video(dir.path(), "corrupt.mp4", "corrupt");
    assert!(matches!(
        coordinator.process_single(request(corrupt, dir.path().join("out"), "")),
        Err(CoreError::Decode { .. })
    ));
}

#[test]
fn test_uppercase_extension_is_accepted() {
    let dir = tempdir().unwrap();
    let video = write_video(dir.path(), "CLIP.MP4", "frames=3\n1:0@0-0");
    let coordinator = coordinator(dir.path(), 1);

    let report = coordinator
        .process_single(request(video, dir.path().join("out"), ""))
        .unwrap();
    assert!(report.detected);
}
