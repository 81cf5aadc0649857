//! Git utilities

use std::path::Path;

/// Check if directory is a git repository
pub fn is_repo(path: impl AsRef<Path>) -> bool {
    path.as_ref().join(".git").exists()
}

/// Whether `git status --porcelain` output reports no changes.
#[must_use]
pub fn is_status_clean(porcelain: &[u8]) -> bool {
    porcelain.trim_ascii().is_empty()
}
