//! Helpers for keeping tracing span attributes free of full paths.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields and report rows: reveals the file name without
/// exposing the directory layout.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
