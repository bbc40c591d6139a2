//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use log::debug;

use wildtrack_core::{CoreConfig, CoreError, ProcessDetectorFactory};

use crate::error::{CliErrorContext, CliResult};

/// Analyses one video and writes its artifacts.
pub mod track;

/// Runs a batch session and persists its archive.
pub mod batch;

pub mod fetch;
pub mod purge;
pub mod status;

/// Builds the detector factory from `--detector-cmd` / `WILDTRACK_DETECTOR_CMD`.
pub(crate) fn detector_factory(command: Option<&str>, config: &CoreConfig) -> CliResult<ProcessDetectorFactory> {
    let command = command
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            CoreError::Config(
                "no detector command configured; pass --detector-cmd or set WILDTRACK_DETECTOR_CMD"
                    .to_string(),
            )
        })?;
    debug!("Using detector command: {}", command);
    ProcessDetectorFactory::from_command_line(command, config.confidence_threshold)
        .cli_context("Invalid detector command")
}
