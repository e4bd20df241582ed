//! Server core functionality
//!
//! Binds the control listener and runs the accept loop.

pub mod core;

pub use core::Server;
