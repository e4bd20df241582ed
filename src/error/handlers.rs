//! Error handlers
//!
//! Translates domain failures into protocol replies.

use crate::error::types::{
    AuthError, FtpServerError, NavigateError, ProtocolError, StorageError, TransferError,
};
use crate::protocol::responses::{self, Reply};
use log::error;

/// Log an FTP server error
pub fn handle_error(err: &FtpServerError) {
    error!("FTP Server Error: {}", err);
}

/// Convert error to FTP reply code
pub fn error_to_ftp_code(err: &FtpServerError) -> u16 {
    match err {
        FtpServerError::Auth(_) => responses::NOT_LOGGED_IN,
        FtpServerError::Storage(StorageError::EmptyPath) => responses::SYNTAX_ERROR_ARGS,
        FtpServerError::Storage(_) => responses::FILE_UNAVAILABLE,
        FtpServerError::Navigate(NavigateError::EmptyPath) => responses::SYNTAX_ERROR_ARGS,
        FtpServerError::Navigate(_) => responses::FILE_UNAVAILABLE,
        FtpServerError::Transfer(TransferError::Io(_)) => responses::INSUFFICIENT_STORAGE,
        FtpServerError::Transfer(_) => responses::TRANSFER_ABORTED,
        FtpServerError::Protocol(ProtocolError::InvalidPort(_)) => responses::SYNTAX_ERROR_ARGS,
        FtpServerError::Protocol(ProtocolError::UnsupportedType(_)) => {
            responses::NOT_IMPLEMENTED_FOR_PARAMETER
        }
    }
}

/// Build the reply sent to the client for `err`.
///
/// Every authentication failure shares one reply so a client cannot tell an
/// unknown user from a wrong password.
pub fn error_to_reply(err: &FtpServerError) -> Reply {
    let code = error_to_ftp_code(err);
    let text = match err {
        FtpServerError::Auth(AuthError::MissingUsername)
        | FtpServerError::Auth(AuthError::UserNotFound(_))
        | FtpServerError::Auth(AuthError::InvalidPassword(_)) => "Invalid username or password",
        FtpServerError::Storage(StorageError::EmptyPath)
        | FtpServerError::Navigate(NavigateError::EmptyPath)
        | FtpServerError::Protocol(ProtocolError::InvalidPort(_)) => {
            "Syntax error in parameters or arguments"
        }
        FtpServerError::Storage(StorageError::NotFound(_))
        | FtpServerError::Storage(StorageError::NotAFile(_))
        | FtpServerError::Storage(StorageError::PathTraversal(_))
        | FtpServerError::Storage(StorageError::OutsideRoot(_)) => "File Not Found",
        FtpServerError::Storage(StorageError::Io(_)) => {
            "Requested action not taken. File unavailable"
        }
        FtpServerError::Navigate(_) => "Requested action not taken. File unavailable",
        FtpServerError::Transfer(TransferError::Io(_)) => {
            "Requested action not taken. Insufficient storage space in system"
        }
        FtpServerError::Transfer(_) => "Connection closed; transfer aborted",
        FtpServerError::Protocol(ProtocolError::UnsupportedType(_)) => {
            "Command not implemented for that parameter"
        }
    };
    Reply::new(code, text)
}
