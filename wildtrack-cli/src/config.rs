// wildtrack-cli/src/config.rs
//
// Default values for CLI arguments and the translation of global and
// per-command arguments into a validated CoreConfig.

use std::path::Path;
use std::time::Duration;

use wildtrack_core::{CoreConfig, CoreConfigBuilder, CoreResult};

pub const DEFAULT_OUTPUT_DIR: &str = "wildtrack_output";
pub const DEFAULT_PREFERENCES: &str = "keep_summary";

/// Per-command overrides applied on top of the environment configuration.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides<'a> {
    pub workspace: Option<&'a Path>,
    pub every_n_frame: Option<u32>,
    pub workers: Option<u32>,
    pub job_timeout_secs: Option<u64>,
}

/// Builds the core configuration: environment first, then command-line flags.
pub fn build_core_config(overrides: ConfigOverrides<'_>) -> CoreResult<CoreConfig> {
    let base = CoreConfig::from_env()?;
    let mut builder = CoreConfigBuilder::from_config(base);

    if let Some(workspace) = overrides.workspace {
        builder = builder.workspace_dir(workspace.to_path_buf());
    }
    if let Some(stride) = overrides.every_n_frame {
        builder = builder.frame_stride(i64::from(stride));
    }
    if let Some(workers) = overrides.workers {
        builder = builder.worker_count(workers as usize);
    }
    if let Some(secs) = overrides.job_timeout_secs {
        builder = builder.job_timeout(Some(Duration::from_secs(secs)));
    }
    builder.build()
}
