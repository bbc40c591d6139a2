// wildtrack-cli/src/lib.rs
//
// Library portion of the Wildtrack CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{BatchArgs, Cli, Commands, FetchArgs, StatusArgs, TrackArgs};
pub use commands::batch::run_batch;
pub use commands::fetch::run_fetch;
pub use commands::purge::run_purge;
pub use commands::status::run_status;
pub use commands::track::run_track;
pub use error::{CliResult, exit_code};

use wildtrack_core::ArchiveStore;

use crate::config::{ConfigOverrides, build_core_config};

/// Dispatches a parsed command line.
pub fn run(cli: Cli) -> CliResult<()> {
    let workspace = cli.workspace.as_deref();
    match cli.command {
        Commands::Track(args) => run_track(args, workspace),
        Commands::Batch(args) => run_batch(args, workspace),
        Commands::Fetch(args) => run_fetch(args, &archive_store(workspace)?),
        Commands::Status(args) => run_status(args, &archive_store(workspace)?),
        Commands::Purge => run_purge(&archive_store(workspace)?),
    }
}

fn archive_store(workspace: Option<&std::path::Path>) -> CliResult<ArchiveStore> {
    let config = build_core_config(ConfigOverrides {
        workspace,
        ..Default::default()
    })?;
    Ok(ArchiveStore::new(config.archive_dir, config.archive_ttl))
}
