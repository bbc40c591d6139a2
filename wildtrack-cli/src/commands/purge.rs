//! Implementation of the 'purge' subcommand.

use log::info;

use wildtrack_core::ArchiveStore;

use crate::error::CliResult;

pub fn run_purge(store: &ArchiveStore) -> CliResult<()> {
    let evicted = store.evict_expired()?;
    info!(
        "Removed {} expired archive(s) from {}",
        evicted,
        store.root().display()
    );
    println!("{}", evicted);
    Ok(())
}
