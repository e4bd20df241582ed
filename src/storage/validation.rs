//! Path validation
//!
//! Virtual paths are what the client sees: `/`-separated and rooted at the
//! server's base directory. Real paths are the filesystem locations behind them.

use crate::error::StorageError;
use std::path::{Path, PathBuf};

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\')
}

/// True when any `/` or `\` separated segment of `path` is `..`.
pub fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Resolves `target` against the current virtual directory.
///
/// Absolute targets start from the server root. Parent segments are refused
/// outright, whether or not the resulting path would exist.
pub fn resolve_virtual_path(current_virtual_path: &str, target: &str) -> Result<String, StorageError> {
    if has_parent_segment(target) {
        return Err(StorageError::PathTraversal(target.to_string()));
    }

    let base = if is_absolute(target) { "" } else { current_virtual_path };
    let joined: Vec<&str> = segments(base).chain(segments(target)).collect();

    Ok(format!("/{}", joined.join("/")))
}

/// Resolves a CWD target. `..` pops one level and stops at the root.
pub fn resolve_cwd_path(current_virtual_path: &str, target: &str) -> String {
    let mut stack: Vec<&str> = if is_absolute(target) {
        Vec::new()
    } else {
        segments(current_virtual_path).collect()
    };

    for segment in segments(target) {
        if segment == ".." {
            stack.pop();
        } else {
            stack.push(segment);
        }
    }

    format!("/{}", stack.join("/"))
}

/// Maps a normalized virtual path onto the server root.
pub fn virtual_to_real_path(server_root: &Path, virtual_path: &str) -> PathBuf {
    segments(virtual_path).fold(server_root.to_path_buf(), |path, segment| path.join(segment))
}

/// Canonicalizes `real_path` and checks it is still under `server_root`.
///
/// `server_root` must already be canonical. Catches symlinks that lead out
/// of the served tree.
pub fn ensure_within_root(server_root: &Path, real_path: &Path) -> Result<PathBuf, StorageError> {
    let canonical = real_path.canonicalize()?;
    if canonical.starts_with(server_root) {
        Ok(canonical)
    } else {
        Err(StorageError::OutsideRoot(real_path.display().to_string()))
    }
}
