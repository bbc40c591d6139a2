// wildtrack-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_OUTPUT_DIR, DEFAULT_PREFERENCES};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Wildtrack: wildlife detection for trail-camera video",
    long_about = "Samples frames from videos, runs a tracking detector on them and packages per-video results via wildtrack-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory for session workspaces and archives.
    #[arg(long, global = true, value_name = "DIR", env = "WILDTRACK_WORKSPACE_DIR")]
    pub workspace: Option<PathBuf>,

    /// Optional: Directory for log files. Logs go to stderr only when omitted.
    #[arg(short, long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs detection on a single video and writes its artifacts to a directory
    Track(TrackArgs),
    /// Runs a batch session over videos and directories and archives the results
    Batch(BatchArgs),
    /// Writes the archive of a finished batch session to a file
    Fetch(FetchArgs),
    /// Prints the manifest of a finished batch session
    Status(StatusArgs),
    /// Removes expired archives
    Purge,
}

/// Options shared by the processing commands.
#[derive(Args, Debug, Clone)]
pub struct DetectionArgs {
    /// Comma-separated artifacts to keep: keep_summary, generate_annotated_video,
    /// keep_detailed_results, keep_original
    #[arg(short, long, value_name = "LIST", default_value = DEFAULT_PREFERENCES)]
    pub preferences: String,

    /// Run the detector on every Nth frame only
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub every_n_frame: Option<u32>,

    /// Tracker command speaking the JSON-lines detector protocol.
    /// Can also be set via the WILDTRACK_DETECTOR_CMD environment variable.
    #[arg(long, value_name = "CMD", env = "WILDTRACK_DETECTOR_CMD")]
    pub detector_cmd: Option<String>,

    /// Print the result as JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Video file to analyse
    #[arg(required = true, value_name = "VIDEO")]
    pub video: PathBuf,

    /// Directory where artifacts are written
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    #[command(flatten)]
    pub detection: DetectionArgs,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Video files or directories containing videos
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Number of videos processed in parallel
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: Option<u32>,

    /// Abandon a video after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub job_timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Session identifier printed by `wildtrack batch`
    #[arg(required = true, value_name = "SESSION_ID")]
    pub session_id: String,

    /// File the archive is written to
    #[arg(short, long, required = true, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Session identifier printed by `wildtrack batch`
    #[arg(required = true, value_name = "SESSION_ID")]
    pub session_id: String,
}
