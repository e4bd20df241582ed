//! Error types
//!
//! Defines domain-specific error types for each module of the FTP server.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Authentication module errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No username supplied before PASS")]
    MissingUsername,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid password for user: {0}")]
    InvalidPassword(String),
}

/// Storage module errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Empty path")]
    EmptyPath,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    #[error("Path resolves outside the server root: {0}")]
    OutsideRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Navigate module errors
#[derive(Error, Debug)]
pub enum NavigateError {
    #[error("Empty path")]
    EmptyPath,

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),
}

/// Transfer module errors
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(SocketAddr),

    #[error("Transfer I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Syntax errors in command arguments
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid PORT argument: {0}")]
    InvalidPort(String),

    #[error("Unsupported TYPE: {0}")]
    UnsupportedType(String),
}

/// General FTP server error that encompasses all error types
#[derive(Error, Debug)]
pub enum FtpServerError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Navigate error: {0}")]
    Navigate(#[from] NavigateError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
