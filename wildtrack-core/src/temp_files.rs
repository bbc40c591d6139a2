//! Session workspace management.
//!
//! Each batch session gets an exclusive directory under the configured
//! workspace root. It is a `TempDir`, so it is removed when the session
//! drops it: after the archive is built or after the session fails.

use crate::error::CoreResult;

use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempDir};

/// Creates the exclusive workspace for a session. Auto-cleaned when dropped.
pub fn create_session_workspace(root: &Path, session_id: &str) -> CoreResult<TempDir> {
    std::fs::create_dir_all(root)?;
    Ok(TempFileBuilder::new()
        .prefix(&format!("session_{session_id}_"))
        .tempdir_in(root)?)
}

/// Creates the per-job subdirectory inside a session workspace.
pub fn create_job_dir(workspace: &Path, slot: usize) -> CoreResult<PathBuf> {
    let dir = workspace.join(format!("job_{slot:04}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Creates a temporary file in `dir` that can later be persisted atomically.
pub fn create_temp_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!(".{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;
    Ok(temp_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let root = tempdir().unwrap();
        let workspace = create_session_workspace(root.path(), "20240101000000_abc").unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("session_20240101000000_abc_"));

        let job_dir = create_job_dir(&path, 3).unwrap();
        assert!(job_dir.ends_with("job_0003"));

        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_file_is_hidden_until_persisted() {
        let dir = tempdir().unwrap();
        let file = create_temp_file(dir.path(), "archive", "zip").unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".archive_"));
        assert!(name.ends_with(".zip"));
    }
}
