//! Directory lister
//!
//! Renders `ls -l` style lines for the LIST command:
//! `<d|-><perms> <rights> <owner> <size> <created> <name>`.

use chrono::{DateTime, Local};
use log::{debug, info};
use std::fmt;
use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::StorageError;
use crate::storage::validation::ensure_within_root;

/// Size reported for directories
pub const DIRECTORY_SIZE_PLACEHOLDER: u64 = 999;

/// Fine-grained permissions are not modelled.
const PERMISSION_PLACEHOLDER: &str = "---------";

const DATE_FORMAT: &str = "%b %d %H:%M";

/// One rendered line of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub is_dir: bool,
    /// Best-effort attribute bitmask, `0` when unavailable
    pub rights: u32,
    pub owner: String,
    pub size: u64,
    pub created: Option<DateTime<Local>>,
    pub name: String,
}

impl ListingEntry {
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let is_dir = metadata.is_dir();
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Local>::from);

        Self {
            is_dir,
            rights: rights_of(metadata),
            owner: owner_of(metadata),
            size: if is_dir {
                DIRECTORY_SIZE_PLACEHOLDER
            } else {
                metadata.len()
            },
            created,
            name: name.into(),
        }
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created = match &self.created {
            Some(created) => created.format(DATE_FORMAT).to_string(),
            None => "Jan 01 00:00".to_string(),
        };

        write!(
            f,
            "{}{} {} {} {} {} {}{}",
            if self.is_dir { 'd' } else { '-' },
            PERMISSION_PLACEHOLDER,
            self.rights,
            self.owner,
            self.size,
            created,
            self.name,
            if self.is_dir { "/" } else { "" }
        )
    }
}

#[cfg(unix)]
fn rights_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn rights_of(_metadata: &Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn owner_of(metadata: &Metadata) -> String {
    use std::os::unix::fs::MetadataExt;
    metadata.uid().to_string()
}

#[cfg(not(unix))]
fn owner_of(_metadata: &Metadata) -> String {
    "owner".to_string()
}

/// Lists `path`: one entry per child for a directory (subdirectories first,
/// each group in enumeration order), or a single entry for a file.
///
/// Symlinks whose target lies outside the canonical `server_root` are left
/// out of the listing.
pub fn list_path(server_root: &Path, path: &Path) -> Result<Vec<ListingEntry>, StorageError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(StorageError::Io(e)),
    };

    if !metadata.is_dir() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        return Ok(vec![ListingEntry::from_metadata(name, &metadata)]);
    }

    let mut directories = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        let is_symlink = entry.file_type().is_ok_and(|file_type| file_type.is_symlink());
        if is_symlink && ensure_within_root(server_root, &entry.path()).is_err() {
            debug!("Skipping {} in listing: outside server root", entry.path().display());
            continue;
        }

        // Follow symlinks so a linked directory is listed as a directory.
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {} in listing: {}", entry.path().display(), e);
                continue;
            }
        };

        let listing_entry = ListingEntry::from_metadata(name, &metadata);
        if listing_entry.is_dir {
            directories.push(listing_entry);
        } else {
            files.push(listing_entry);
        }
    }

    info!(
        "Listed {} - {} directories, {} files",
        path.display(),
        directories.len(),
        files.len()
    );

    directories.extend(files);
    Ok(directories)
}

/// Joins entries into the payload sent over the data connection.
pub fn render_listing(entries: &[ListingEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\r\n", entry))
        .collect()
}
