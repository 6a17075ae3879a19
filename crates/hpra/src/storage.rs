use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Sibling path used while `path` is being written.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes `content` to `path` via a staging file and a rename, so readers
/// never observe a half-written file and a failed write leaves any
/// previous file in place.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let staging = staging_path(path);

    let written = std::fs::File::create(&staging).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(StorageError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        });
    }

    std::fs::rename(&staging, path).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        StorageError::RenameFile {
            from: staging.clone(),
            to: path.to_path_buf(),
            source: e,
        }
    })
}
