// ============================================================================
// wildtrack-cli/src/main.rs
// ============================================================================
//
// WILDTRACK CLI: Main Entry Point
//
// Parses the command line, installs logging and dispatches to the command
// implementations in the library half of this crate. Errors are printed to
// stderr and mapped to a non-zero exit code.

use clap::Parser;
use console::style;
use log::debug;

use std::process;

use wildtrack_cli::logging::setup_logging;
use wildtrack_cli::{Cli, exit_code, run};

fn main() {
    let cli = Cli::parse();

    match setup_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(path)) => debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("{} failed to open log file: {}", style("Warning:").yellow().bold(), e),
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(exit_code(&e));
    }
}
