// ============================================================================
// wildtrack-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig starting from the defaults. `build()`
// runs the same validation as `CoreConfig::validate`, so a built config is
// always usable by the session coordinator.
//
// KEY COMPONENTS:
// - CoreConfigBuilder: Builder struct for creating CoreConfig instances

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::{AnnotationPolicy, ClassLabels, CoreConfig};
use crate::error::CoreResult;
use crate::model::FrameStride;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use wildtrack_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .frame_stride(2)
///     .worker_count(2)
///     .job_timeout(Some(Duration::from_secs(600)))
///     .build()
///     .unwrap();
/// assert_eq!(config.frame_stride.get(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
    archive_dir_set: bool,
    frame_stride: i64,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::from_config(CoreConfig::default())
    }

    /// Starts from an existing configuration, e.g. one read from the environment.
    pub fn from_config(config: CoreConfig) -> Self {
        Self {
            frame_stride: i64::from(config.frame_stride.get()),
            config,
            archive_dir_set: false,
        }
    }

    /// Sets the workspace root. The archive directory follows it unless set explicitly.
    pub fn workspace_dir(mut self, workspace_dir: PathBuf) -> Self {
        if !self.archive_dir_set {
            self.config.archive_dir = workspace_dir.join("archives");
        }
        self.config.workspace_dir = workspace_dir;
        self
    }

    pub fn archive_dir(mut self, archive_dir: PathBuf) -> Self {
        self.config.archive_dir = archive_dir;
        self.archive_dir_set = true;
        self
    }

    /// Sets the default sampling interval. Validated in `build()`.
    pub fn frame_stride(mut self, stride: i64) -> Self {
        self.frame_stride = stride;
        self
    }

    pub fn worker_count(mut self, workers: usize) -> Self {
        self.config.worker_count = workers;
        self
    }

    pub fn job_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.job_timeout = timeout;
        self
    }

    pub fn archive_ttl(mut self, ttl: Duration) -> Self {
        self.config.archive_ttl = ttl;
        self
    }

    pub fn confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    pub fn class_labels(mut self, labels: ClassLabels) -> Self {
        self.config.class_labels = labels;
        self
    }

    pub fn annotation_policy(mut self, policy: AnnotationPolicy) -> Self {
        self.config.annotation_policy = policy;
        self
    }

    pub fn supported_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.supported_extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Builds and validates the CoreConfig.
    pub fn build(self) -> CoreResult<CoreConfig> {
        let mut config = self.config;
        config.frame_stride = FrameStride::new(self.frame_stride)?;
        config.validate()?;
        Ok(config)
    }
}
