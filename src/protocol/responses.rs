//! FTP Response handling
//!
//! Defines FTP reply codes and the single-line reply encoder.

use std::fmt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Standard FTP reply codes
pub const FILE_STATUS_OK: u16 = 150;
pub const OK: u16 = 200;
pub const NOT_IMPLEMENTED_SUPERFLUOUS: u16 = 202;
pub const SYSTEM_TYPE: u16 = 215;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const LOGIN_SUCCESS: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATHNAME_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const TRANSFER_ABORTED: u16 = 426;
pub const NOT_LOGGED_IN: u16 = 430;
pub const INSUFFICIENT_STORAGE: u16 = 452;
pub const SYNTAX_ERROR: u16 = 500;
pub const SYNTAX_ERROR_ARGS: u16 = 501;
pub const NOT_IMPLEMENTED_FOR_PARAMETER: u16 = 504;
pub const FILE_UNAVAILABLE: u16 = 550;

/// One `<code> <text>` status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    text: String,
}

impl Reply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The reply as sent on the control connection, CRLF terminated.
    pub fn to_wire(&self) -> String {
        format_response(self.code, &self.text)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

/// Format an FTP response message
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Write `reply` to the control connection and flush it.
pub async fn send_reply<W>(writer: &mut W, reply: &Reply) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(reply.to_wire().as_bytes()).await?;
    writer.flush().await
}
