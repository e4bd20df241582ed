//! Navigate module
//!
//! Handles working-directory changes for FTP sessions.

mod operations;

pub use operations::change_directory;
