//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write content atomically to a file.
///
/// Uses the write-to-temp-then-rename strategy to prevent partial writes:
/// the content is written to a `.tmp` sibling under an exclusive advisory
/// lock, any existing target is renamed to a `.bak` sibling, the temp file
/// is renamed into place, and the backup is deleted.
///
/// Not safe for concurrent invocation on the same path; callers must
/// serialize saves per path. A crash between the two renames can leave the
/// target absent with only the `.bak` present, in which case recovery is
/// manual.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Siblings in the same directory, so the renames stay on one filesystem
    let temp_path = sibling(path, ".tmp");
    let backup_path = sibling(path, ".bak");

    tracing::debug!(?temp_path, "Writing temp file");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    // Lock released on drop
    drop(temp_file);

    let had_original = path.exists();
    if had_original {
        tracing::debug!(?backup_path, "Renaming original to backup");
        fs::rename(path, &backup_path).map_err(|e| Error::io(path, e))?;
    }

    tracing::debug!(?path, "Renaming temp file into place");
    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    if had_original {
        if let Err(e) = fs::remove_file(&backup_path) {
            tracing::warn!(?backup_path, %e, "Failed to delete backup after save");
        }
    }

    Ok(())
}

/// Append a suffix to the final path component: `config.yaml` -> `config.yaml.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_appends_suffix() {
        let path = Path::new("/some/dir/config.yaml");
        assert_eq!(
            sibling(path, ".tmp"),
            PathBuf::from("/some/dir/config.yaml.tmp")
        );
        assert_eq!(
            sibling(path, ".bak"),
            PathBuf::from("/some/dir/config.yaml.bak")
        );
    }

    #[test]
    fn test_read_text_missing_file() {
        let result = read_text(Path::new("/nonexistent/definitely/missing.yaml"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
