//! FTP Transfer modes
//!
//! Transfer type (TYPE) and data-connection mode (PORT) settings of a session.

use crate::error::ProtocolError;
use std::net::SocketAddr;

/// Encoding applied to RETR payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    /// `TYPE I`: bytes are sent unmodified
    #[default]
    Binary,
    /// `TYPE A`: line endings are converted to CRLF
    Text,
}

impl TransferType {
    /// Maps a TYPE argument. Only `I` and `A` are accepted, case-sensitively.
    pub fn from_type_code(code: Option<&str>) -> Result<Self, ProtocolError> {
        match code {
            Some("I") => Ok(TransferType::Binary),
            Some("A") => Ok(TransferType::Text),
            other => Err(ProtocolError::UnsupportedType(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// How the next data connection is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataConnectionMode {
    /// No endpoint negotiated
    #[default]
    None,
    /// Server dials the client-advertised endpoint
    Active(SocketAddr),
}
