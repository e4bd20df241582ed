//! Navigation operations implementation

use crate::error::NavigateError;
use crate::storage::validation::{ensure_within_root, resolve_cwd_path, virtual_to_real_path};
use std::path::Path;

/// Changes the working directory for a session, returning the new virtual path.
pub fn change_directory(
    server_root: &Path,
    current_virtual_path: &str,
    target_path: &str,
) -> Result<String, NavigateError> {
    if target_path.is_empty() {
        return Err(NavigateError::EmptyPath);
    }

    let new_virtual_path = resolve_cwd_path(current_virtual_path, target_path);
    let real_path = virtual_to_real_path(server_root, &new_virtual_path);

    if !real_path.exists() {
        return Err(NavigateError::DirectoryNotFound(new_virtual_path));
    }

    if !real_path.is_dir() {
        return Err(NavigateError::NotADirectory(new_virtual_path));
    }

    // A symlinked directory pointing outside the root is treated as absent.
    if ensure_within_root(server_root, &real_path).is_err() {
        return Err(NavigateError::DirectoryNotFound(new_virtual_path));
    }

    Ok(new_virtual_path)
}
