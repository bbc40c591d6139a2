//! Implementation of the 'fetch' subcommand.

use log::info;

use wildtrack_core::ArchiveStore;

use crate::cli::FetchArgs;
use crate::error::{CliErrorContext, CliResult};

use std::fs;

pub fn run_fetch(args: FetchArgs, store: &ArchiveStore) -> CliResult<()> {
    let bytes = store.open(&args.session_id)?;
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .cli_with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(&args.output, &bytes)
        .cli_with_context(|| format!("Failed to write archive to '{}'", args.output.display()))?;
    info!(
        "Wrote archive for session {} to {} ({} bytes)",
        args.session_id,
        args.output.display(),
        bytes.len()
    );
    Ok(())
}
