//! Transfer module for FTP server
//!
//! Handles transfer settings, PORT negotiation, active-mode data connections
//! and the file/listing transfer engine.

pub mod data_channel;
pub mod file_ops;
pub mod modes;
pub mod operations;
pub mod port;

// Re-export key types and functions
pub use data_channel::DataConnection;
pub use file_ops::{send_file, send_listing, to_network_ascii};
pub use modes::{DataConnectionMode, TransferType};
pub use operations::{retrieve_file, transmit_listing};
pub use port::parse_port_argument;
