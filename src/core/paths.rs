//! Path normalization utilities
//!
//! Display names use '/' as separator and are relative to the scanned root.

use std::path::Path;

/// Normalize a path to use '/' as separator
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Name shown for a file: relative to `root` when possible, else the file
/// name, else the path as given
pub fn display_name(path: &Path, root: &Path) -> String {
    make_relative(path, root)
        .filter(|r| !r.is_empty())
        .or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| normalize_path(path))
}
