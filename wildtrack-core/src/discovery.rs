//! Input discovery for batch submissions.
//!
//! Batch inputs may name files or directories. Directories are scanned at
//! the top level only for files with a supported extension
//! (case-insensitive); explicit files are passed through unchanged so an
//! unsupported one becomes a per-job failure rather than a silent drop.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Finds supported video files in the top level of `input_dir`, sorted by path.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The discovered files
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no supported files are present
///
/// # Examples
///
/// ```rust,no_run
/// use wildtrack_core::{CoreConfig, find_processable_files};
/// use std::path::Path;
///
/// let config = CoreConfig::default();
/// let files = find_processable_files(Path::new("/path/to/camera-dump"), &config).unwrap();
/// println!("Found {} videos", files.len());
/// ```
pub fn find_processable_files(input_dir: &Path, config: &CoreConfig) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && config.is_supported_video(&path)).then_some(path)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        Err(CoreError::NoFilesFound(input_dir.to_path_buf()))
    } else {
        Ok(files)
    }
}

/// Expands a list of files and directories into the ordered list of videos to submit.
pub fn expand_inputs(inputs: &[PathBuf], config: &CoreConfig) -> CoreResult<Vec<PathBuf>> {
    let mut videos = Vec::new();
    for input in inputs {
        if input.is_dir() {
            videos.extend(find_processable_files(input, config)?);
        } else {
            videos.push(input.clone());
        }
    }
    if videos.is_empty() {
        return Err(CoreError::Validation(
            "at least one video file is required".to_string(),
        ));
    }
    Ok(videos)
}
