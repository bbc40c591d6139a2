//! Implementation of the 'status' subcommand.

use wildtrack_core::ArchiveStore;

use crate::cli::StatusArgs;
use crate::error::CliResult;
use crate::output::print_manifest;

pub fn run_status(args: StatusArgs, store: &ArchiveStore) -> CliResult<()> {
    let manifest = store.manifest(&args.session_id)?;
    print_manifest(&manifest);
    Ok(())
}
