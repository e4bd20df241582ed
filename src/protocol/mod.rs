//! FTP Protocol implementation
//!
//! Handles FTP command parsing, dispatch, and response generation.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandStatus, parse_command};
pub use handlers::{CommandResult, handle_command};
pub use responses::{Reply, send_reply};
