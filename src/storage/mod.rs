//! File system storage management
//!
//! Handles path validation, retrieval checks and directory listings.

pub mod listing;
pub mod operations;
pub mod validation;

pub use listing::{ListingEntry, list_path, render_listing};
pub use operations::{list_directory, prepare_file_retrieval};
pub use validation::{resolve_cwd_path, resolve_virtual_path, virtual_to_real_path};
