// ============================================================================
// wildtrack-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Log Dispatch
//
// Installs a fern dispatcher for the `log` facade. Console output goes to
// stderr with a colored level; when a log directory is given, a plain copy
// of every record is appended to `wildtrack_<timestamp>.log` there.
//
// LEVELS:
// - default: Info for wildtrack crates, Warn for dependencies
// - --verbose: Debug for wildtrack crates

use console::style;
use log::{Level, LevelFilter};

use std::fs;
use std::path::{Path, PathBuf};

use wildtrack_core::CoreResult;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn colored_level(level: Level) -> String {
    let label = format!("{:<5}", level);
    match level {
        Level::Error => style(label).red().bold().to_string(),
        Level::Warn => style(label).yellow().to_string(),
        Level::Info => style(label).green().to_string(),
        Level::Debug => style(label).blue().to_string(),
        Level::Trace => style(label).magenta().to_string(),
    }
}

/// Installs the global logger. Returns the log file path when one was opened.
pub fn setup_logging(verbose: bool, log_dir: Option<&Path>) -> CoreResult<Option<PathBuf>> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{} {}", colored_level(record.level()), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for("wildtrack_core", level)
        .level_for("wildtrack_cli", level)
        .level_for("wildtrack", level)
        .chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("wildtrack_{}.log", get_timestamp()));
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(&path)?);
        dispatch = dispatch.chain(file);
        log_path = Some(path);
    }

    // A logger may already be installed when commands run inside tests.
    let _ = dispatch.apply();
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let stamp = get_timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
    }
}
