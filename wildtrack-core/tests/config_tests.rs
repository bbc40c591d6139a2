// wildtrack-core/tests/config_tests.rs

use std::path::PathBuf;
use std::time::Duration;
use wildtrack_core::config::{
    DEFAULT_ARCHIVE_TTL, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_FRAME_STRIDE,
};
use wildtrack_core::{AnnotationPolicy, CoreConfig, CoreConfigBuilder, CoreError};

#[test]
fn test_default_config() {
    let config = CoreConfig::default();
    assert_eq!(config.frame_stride.get(), DEFAULT_FRAME_STRIDE);
    assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
    assert_eq!(config.archive_ttl, DEFAULT_ARCHIVE_TTL);
    assert_eq!(config.annotation_policy, AnnotationPolicy::SampledOnly);
    assert_eq!(config.supported_extensions, vec!["mp4", "avi"]);
    assert!(config.worker_count >= 1);
    assert_eq!(config.class_labels.label_for(1), "deer");
    assert_eq!(config.class_labels.label_for(42), "Unknown");
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_pattern() {
    let config = CoreConfigBuilder::new()
        .workspace_dir(PathBuf::from("/srv/wildtrack"))
        .frame_stride(5)
        .worker_count(2)
        .job_timeout(Some(Duration::from_secs(600)))
        .annotation_policy(AnnotationPolicy::HoldLast)
        .build()
        .unwrap();

    assert_eq!(config.workspace_dir, PathBuf::from("/srv/wildtrack"));
    assert_eq!(config.archive_dir, PathBuf::from("/srv/wildtrack/archives"));
    assert_eq!(config.frame_stride.get(), 5);
    assert_eq!(config.worker_count, 2);
    assert_eq!(config.job_timeout, Some(Duration::from_secs(600)));
    assert_eq!(config.annotation_policy, AnnotationPolicy::HoldLast);
}

#[test]
fn test_builder_rejects_invalid_values() {
    assert!(matches!(
        CoreConfigBuilder::new().frame_stride(0).build(),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        CoreConfigBuilder::new().worker_count(0).build(),
        Err(CoreError::Config(_))
    ));
    assert!(matches!(
        CoreConfigBuilder::new().confidence_threshold(1.5).build(),
        Err(CoreError::Config(_))
    ));
    assert!(matches!(
        CoreConfigBuilder::new().job_timeout(Some(Duration::ZERO)).build(),
        Err(CoreError::Config(_))
    ));
}

#[test]
fn test_config_serializes_to_json() {
    let config = CoreConfigBuilder::new().frame_stride(4).build().unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: CoreConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.frame_stride.get(), 4);
    assert_eq!(back.supported_extensions, config.supported_extensions);
}
