//! Configuration structures and constants for the wildtrack-core library.
//!
//! This module provides the configuration that controls sampling, worker
//! concurrency, archive retention and how detector output is labelled.

mod builder;
pub mod utils;

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub use builder::CoreConfigBuilder;

use crate::error::{CoreError, CoreResult};
use crate::model::FrameStride;
use utils::*;

// Default constants

/// Default sampling interval. Every third frame is sent to the detector.
pub const DEFAULT_FRAME_STRIDE: u32 = 3;

/// Minimum tracker confidence forwarded to the detector.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// How long a persisted archive stays retrievable.
pub const DEFAULT_ARCHIVE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Root of per-session workspaces.
pub const DEFAULT_WORKSPACE_DIR: &str = "temp_predictions";

/// Container extensions accepted as video input.
pub const DEFAULT_SUPPORTED_EXTENSIONS: [&str; 2] = ["mp4", "avi"];

/// Label used for class ids that have no configured name.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// How the annotated copy treats frames that were not sent to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationPolicy {
    /// Boxes are drawn only on sampled frames.
    #[default]
    SampledOnly,
    /// Boxes from the latest sampled frame are redrawn until the next one.
    HoldLast,
}

impl std::str::FromStr for AnnotationPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sampled_only" | "sampled-only" => Ok(AnnotationPolicy::SampledOnly),
            "hold_last" | "hold-last" => Ok(AnnotationPolicy::HoldLast),
            other => Err(CoreError::Config(format!(
                "unknown annotation policy '{}'",
                other
            ))),
        }
    }
}

/// Mapping from detector class ids to human readable labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabels(BTreeMap<u32, String>);

impl ClassLabels {
    pub fn new(labels: BTreeMap<u32, String>) -> Self {
        Self(labels)
    }

    /// Label for `class_id`, or `Unknown` when it is not mapped.
    pub fn label_for(&self, class_id: u32) -> &str {
        self.0
            .get(&class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        let labels = [(0, "coyote"), (1, "deer"), (2, "raccoon"), (3, "turkey")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        Self(labels)
    }
}

/// Main configuration structure for the wildtrack-core library.
///
/// It is typically created by the consumer of the library (e.g. wildtrack-cli)
/// and handed to the session coordinator. All fields have defaults; use
/// [`CoreConfig::from_env`] to apply `WILDTRACK_*` overrides or the builder for
/// explicit values.
///
/// # Examples
///
/// ```rust,no_run
/// use wildtrack_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .workspace_dir(PathBuf::from("/var/lib/wildtrack"))
///     .frame_stride(5)
///     .worker_count(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Root under which each session gets its own exclusive workspace
    pub workspace_dir: PathBuf,

    /// Directory holding persisted archives and their manifests
    pub archive_dir: PathBuf,

    /// Default sampling interval for requests that do not specify one
    pub frame_stride: FrameStride,

    /// Upper bound on concurrently running jobs in a batch session
    pub worker_count: usize,

    /// Optional wall-clock limit for a single job
    pub job_timeout: Option<Duration>,

    /// Retention window for persisted archives
    pub archive_ttl: Duration,

    /// Minimum confidence forwarded to the detector
    pub confidence_threshold: f32,

    /// Detector class id to label mapping
    pub class_labels: ClassLabels,

    /// Box drawing behaviour for unsampled frames
    pub annotation_policy: AnnotationPolicy,

    /// Lower-case container extensions accepted for input
    pub supported_extensions: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let workspace_dir = PathBuf::from(DEFAULT_WORKSPACE_DIR);
        Self {
            archive_dir: workspace_dir.join("archives"),
            workspace_dir,
            frame_stride: FrameStride::default(),
            worker_count: default_worker_count(),
            job_timeout: None,
            archive_ttl: DEFAULT_ARCHIVE_TTL,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            class_labels: ClassLabels::default(),
            annotation_policy: AnnotationPolicy::default(),
            supported_extensions: DEFAULT_SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl CoreConfig {
    /// Defaults with `WILDTRACK_*` environment overrides applied.
    pub fn from_env() -> CoreResult<Self> {
        let defaults = Self::default();
        let workspace_dir = get_env_path("WILDTRACK_WORKSPACE_DIR", defaults.workspace_dir);
        let archive_dir = get_env_path("WILDTRACK_ARCHIVE_DIR", workspace_dir.join("archives"));
        let stride = get_env_u32("WILDTRACK_EVERY_N_FRAME", DEFAULT_FRAME_STRIDE);
        let timeout_secs = get_env_u64("WILDTRACK_JOB_TIMEOUT_SECS", 0);

        let config = Self {
            workspace_dir,
            archive_dir,
            frame_stride: FrameStride::new(i64::from(stride))?,
            worker_count: get_env_usize("WILDTRACK_WORKERS", defaults.worker_count),
            job_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            archive_ttl: get_env_duration_secs("WILDTRACK_ARCHIVE_TTL_SECS", defaults.archive_ttl),
            confidence_threshold: get_env_f32("WILDTRACK_CONFIDENCE", defaults.confidence_threshold),
            annotation_policy: match std::env::var("WILDTRACK_ANNOTATION_POLICY") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.annotation_policy,
            },
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> CoreResult<()> {
        if self.worker_count == 0 {
            return Err(CoreError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(CoreError::Config(format!(
                "confidence threshold must be in (0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.archive_ttl.is_zero() {
            return Err(CoreError::Config(
                "archive retention must be longer than zero".to_string(),
            ));
        }
        if matches!(self.job_timeout, Some(limit) if limit.is_zero()) {
            return Err(CoreError::Config(
                "job timeout must be longer than zero".to_string(),
            ));
        }
        if self.supported_extensions.is_empty() {
            return Err(CoreError::Config(
                "at least one supported extension is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `path` carries one of the accepted container extensions.
    pub fn is_supported_video(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.supported_extensions.iter().any(|s| *s == ext)
            })
            .unwrap_or(false)
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_stride.get(), DEFAULT_FRAME_STRIDE);
        assert_eq!(config.archive_dir, PathBuf::from("temp_predictions/archives"));
        assert_eq!(config.class_labels.label_for(1), "deer");
        assert_eq!(config.class_labels.label_for(42), UNKNOWN_LABEL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CoreConfig {
            worker_count: 0,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let config = CoreConfig {
            confidence_threshold: 1.5,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supported_video_is_case_insensitive() {
        let config = CoreConfig::default();
        assert!(config.is_supported_video(Path::new("clip.MP4")));
        assert!(config.is_supported_video(Path::new("dir/clip.avi")));
        assert!(!config.is_supported_video(Path::new("clip.mkv")));
        assert!(!config.is_supported_video(Path::new("clip")));
    }

    #[test]
    fn test_annotation_policy_parsing() {
        assert_eq!("hold-last".parse::<AnnotationPolicy>().unwrap(), AnnotationPolicy::HoldLast);
        assert_eq!("sampled_only".parse::<AnnotationPolicy>().unwrap(), AnnotationPolicy::SampledOnly);
        assert!("sometimes".parse::<AnnotationPolicy>().is_err());
    }
}
