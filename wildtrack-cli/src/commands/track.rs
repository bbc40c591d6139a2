//! Implementation of the 'track' subcommand.
//!
//! Runs the single-video flow: the video is processed synchronously and the
//! requested artifacts are written straight to the output directory.

use log::info;

use wildtrack_core::{FfmpegBackend, PreferenceSet, SessionCoordinator, SingleVideoRequest};

use crate::cli::TrackArgs;
use crate::commands::detector_factory;
use crate::config::{ConfigOverrides, build_core_config};
use crate::error::{CliErrorContext, CliResult};
use crate::output::print_single_report;

use std::path::Path;

pub fn run_track(args: TrackArgs, workspace: Option<&Path>) -> CliResult<()> {
    let preferences: PreferenceSet = args.detection.preferences.parse()?;
    let config = build_core_config(ConfigOverrides {
        workspace,
        every_n_frame: args.detection.every_n_frame,
        ..Default::default()
    })?;
    let detectors = detector_factory(args.detection.detector_cmd.as_deref(), &config)?;
    let coordinator = SessionCoordinator::new(config, FfmpegBackend, detectors)?;

    info!("Processing {}", args.video.display());
    let report = coordinator.process_single(SingleVideoRequest {
        video: args.video,
        preferences,
        stride: None,
        output_dir: args.output,
    })?;

    if args.detection.json {
        let json = serde_json::to_string_pretty(&report).cli_context("Failed to render report")?;
        println!("{}", json);
    } else {
        print_single_report(&report);
    }
    Ok(())
}
