//! Transfer operations
//!
//! Open a data connection, run one transfer over it, close it. The
//! connection is closed whether or not the transfer succeeded.

use log::{error, info};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::TransferError;
use crate::transfer::data_channel::DataConnection;
use crate::transfer::file_ops::{send_file, send_listing};
use crate::transfer::modes::TransferType;

/// RETR over an active-mode connection to `endpoint`.
pub async fn retrieve_file(
    endpoint: SocketAddr,
    path: &Path,
    transfer_type: TransferType,
    connect_timeout: Duration,
) -> Result<u64, TransferError> {
    let mut connection = DataConnection::open(endpoint, connect_timeout).await?;
    let result = send_file(connection.stream_mut(), path, transfer_type).await;
    connection.close().await;

    match &result {
        Ok(bytes) => info!("Sent {} ({} bytes) to {}", path.display(), bytes, endpoint),
        Err(e) => error!("Transfer of {} to {} failed: {}", path.display(), endpoint, e),
    }
    result
}

/// LIST over an active-mode connection to `endpoint`.
pub async fn transmit_listing(
    endpoint: SocketAddr,
    listing: &str,
    connect_timeout: Duration,
) -> Result<u64, TransferError> {
    let mut connection = DataConnection::open(endpoint, connect_timeout).await?;
    let result = send_listing(connection.stream_mut(), listing).await;
    connection.close().await;

    if let Err(e) = &result {
        error!("Listing transfer to {} failed: {}", endpoint, e);
    }
    result
}
