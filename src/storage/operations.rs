//! Storage operations
//!
//! Resolves and checks the filesystem targets of LIST and RETR before any
//! data connection is opened.

use log::info;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::storage::listing::{ListingEntry, list_path};
use crate::storage::validation::{ensure_within_root, resolve_virtual_path, virtual_to_real_path};

/// Prepares for file retrieval
///
/// Fails with `EmptyPath`, `PathTraversal`, `NotFound`, `NotAFile` or
/// `OutsideRoot`; on success returns the canonical file path.
pub fn prepare_file_retrieval(
    server_root: &Path,
    current_virtual_path: &str,
    filename: &str,
) -> Result<PathBuf, StorageError> {
    if filename.is_empty() {
        return Err(StorageError::EmptyPath);
    }

    let virtual_file_path = resolve_virtual_path(current_virtual_path, filename)?;
    let file_path = virtual_to_real_path(server_root, &virtual_file_path);

    if !file_path.exists() {
        return Err(StorageError::NotFound(virtual_file_path));
    }

    if !file_path.is_file() {
        return Err(StorageError::NotAFile(virtual_file_path));
    }

    let file_path = ensure_within_root(server_root, &file_path)?;

    info!(
        "Prepared file retrieval for {} (virtual: {}, real: {})",
        filename,
        virtual_file_path,
        file_path.display()
    );

    Ok(file_path)
}

/// Picks the LIST target out of the raw argument.
///
/// Leading option tokens such as `-la` are dropped; what remains, if
/// anything, is the path.
pub fn list_target(argument: Option<&str>) -> Option<&str> {
    let mut rest = argument?.trim_start();
    while rest.starts_with('-') {
        rest = match rest.split_once(' ') {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    (!rest.is_empty()).then_some(rest)
}

/// Lists the LIST target, defaulting to the current directory.
pub fn list_directory(
    server_root: &Path,
    current_virtual_path: &str,
    argument: Option<&str>,
) -> Result<Vec<ListingEntry>, StorageError> {
    let virtual_path = match list_target(argument) {
        Some(target) => resolve_virtual_path(current_virtual_path, target)?,
        None => current_virtual_path.to_string(),
    };

    let real_path = virtual_to_real_path(server_root, &virtual_path);
    if !real_path.exists() {
        return Err(StorageError::NotFound(virtual_path));
    }
    let real_path = ensure_within_root(server_root, &real_path)?;

    list_path(server_root, &real_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn served_root() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("readme.txt"), b"hello world").unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs").join("guide.txt"), b"guide").unwrap();
        (dir, root)
    }

    #[test]
    fn retrieval_resolves_relative_to_working_directory() {
        let (_dir, root) = served_root();
        let path = prepare_file_retrieval(&root, "/docs", "guide.txt").unwrap();
        assert_eq!(path, root.join("docs").join("guide.txt"));
    }

    #[test]
    fn retrieval_refuses_empty_missing_and_traversal() {
        let (_dir, root) = served_root();
        assert!(matches!(
            prepare_file_retrieval(&root, "/", ""),
            Err(StorageError::EmptyPath)
        ));
        assert!(matches!(
            prepare_file_retrieval(&root, "/", "nofile.txt"),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            prepare_file_retrieval(&root, "/docs", "../readme.txt"),
            Err(StorageError::PathTraversal(_))
        ));
        assert!(matches!(
            prepare_file_retrieval(&root, "/", "docs"),
            Err(StorageError::NotAFile(_))
        ));
    }

    #[test]
    fn list_target_skips_options() {
        assert_eq!(list_target(None), None);
        assert_eq!(list_target(Some("")), None);
        assert_eq!(list_target(Some("-la")), None);
        assert_eq!(list_target(Some("-l -a docs")), Some("docs"));
        assert_eq!(list_target(Some("docs")), Some("docs"));
    }

    #[test]
    fn list_directory_defaults_to_working_directory() {
        let (_dir, root) = served_root();
        let entries = list_directory(&root, "/docs", None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "guide.txt");
    }

    #[test]
    fn list_directory_reports_missing_path() {
        let (_dir, root) = served_root();
        assert!(matches!(
            list_directory(&root, "/", Some("ghost")),
            Err(StorageError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn list_directory_hides_links_leaving_the_root() {
        let (_dir, root) = served_root();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), b"classified").unwrap();

        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("leak.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("leakdir")).unwrap();
        std::os::unix::fs::symlink(root.join("readme.txt"), root.join("alias.txt")).unwrap();

        let names: Vec<String> = list_directory(&root, "/", None)
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();

        assert!(!names.contains(&"leak.txt".to_string()));
        assert!(!names.contains(&"leakdir".to_string()));
        assert!(names.contains(&"alias.txt".to_string()));
        assert!(names.contains(&"readme.txt".to_string()));
    }
}
