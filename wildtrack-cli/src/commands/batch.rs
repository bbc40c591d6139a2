//! Implementation of the 'batch' subcommand.
//!
//! Expands the inputs into a video list, runs a batch session with a live
//! progress display and prints the per-job outcomes and group mapping.

use log::info;

use wildtrack_core::{
    AbortSignal, BatchReport, BatchRequest, CoreError, FfmpegBackend, JsonReporter,
    PreferenceSet, SessionCoordinator, SessionReporter, TerminalReporter, expand_inputs,
};

use crate::cli::BatchArgs;
use crate::commands::detector_factory;
use crate::config::{ConfigOverrides, build_core_config};
use crate::error::{CliErrorContext, CliResult};
use crate::output::print_batch_report;

use std::path::Path;

pub fn run_batch(args: BatchArgs, workspace: Option<&Path>) -> CliResult<()> {
    let preferences: PreferenceSet = args.detection.preferences.parse()?;
    let config = build_core_config(ConfigOverrides {
        workspace,
        every_n_frame: args.detection.every_n_frame,
        workers: args.workers,
        job_timeout_secs: args.job_timeout,
    })?;

    let videos = expand_inputs(&args.inputs, &config)?;
    info!("Found {} video(s) to process", videos.len());

    let detectors = detector_factory(args.detection.detector_cmd.as_deref(), &config)?;
    let coordinator = SessionCoordinator::new(config, FfmpegBackend, detectors)?;
    let evicted = coordinator.store().evict_expired()?;
    if evicted > 0 {
        info!("Evicted {} expired archive(s)", evicted);
    }

    let reporter: Box<dyn SessionReporter> = if args.detection.json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new())
    };
    let session = coordinator.run_session(
        BatchRequest {
            videos,
            preferences,
            stride: None,
        },
        &AbortSignal::new(),
        reporter.as_ref(),
    )?;
    let report = BatchReport::from_session(&session);

    if args.detection.json {
        let json = serde_json::to_string_pretty(&report).cli_context("Failed to render report")?;
        println!("{}", json);
    } else {
        print_batch_report(&report);
    }

    // Job outcomes are printed first; a session without an archive still fails the command.
    match report.packaging_error {
        Some(reason) => Err(CoreError::Packaging {
            session: report.session_id,
            reason,
        }),
        None => Ok(()),
    }
}
