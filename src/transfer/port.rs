//! PORT argument decoding
//!
//! `h1,h2,h3,h4,p1,p2` → `h1.h2.h3.h4 : p1*256 + p2`

use crate::error::ProtocolError;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Decodes the active-mode endpoint advertised by a PORT command.
pub fn parse_port_argument(arg: Option<&str>) -> Result<SocketAddr, ProtocolError> {
    let arg = match arg {
        Some(arg) if !arg.trim().is_empty() => arg,
        _ => return Err(ProtocolError::InvalidPort("missing argument".into())),
    };

    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 6 {
        return Err(ProtocolError::InvalidPort(format!(
            "expected 6 fields, got {}",
            parts.len()
        )));
    }

    let mut octets = [0u8; 6];
    for (octet, part) in octets.iter_mut().zip(&parts) {
        let invalid = || ProtocolError::InvalidPort(format!("invalid field {:?}", part));
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        *octet = part.parse::<u8>().map_err(|_| invalid())?;
    }

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);

    Ok(SocketAddr::V4(SocketAddrV4::new(ip, port)))
}
