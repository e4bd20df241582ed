//! Module `data_channel`
//!
//! Active-mode data connections: the server dials the endpoint the client
//! advertised with PORT. Each connection carries exactly one transfer.

use log::{debug, error, info};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::TransferError;

/// An open data connection, owned for the duration of one transfer.
#[derive(Debug)]
pub struct DataConnection {
    stream: TcpStream,
    endpoint: SocketAddr,
}

impl DataConnection {
    /// Dials `endpoint`, giving up after `connect_timeout`.
    pub async fn open(
        endpoint: SocketAddr,
        connect_timeout: Duration,
    ) -> Result<Self, TransferError> {
        info!("Active mode: connecting to data socket {}", endpoint);

        match timeout(connect_timeout, TcpStream::connect(endpoint)).await {
            Ok(Ok(stream)) => {
                info!("Data connection established with {}", endpoint);
                Ok(Self { stream, endpoint })
            }
            Ok(Err(source)) => {
                error!("Failed to connect to data socket {}: {}", endpoint, source);
                Err(TransferError::Connect { endpoint, source })
            }
            Err(_) => {
                error!(
                    "Timed out after {:?} connecting to data socket {}",
                    connect_timeout, endpoint
                );
                Err(TransferError::ConnectTimeout(endpoint))
            }
        }
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Shuts the connection down. Failures are logged; the socket is
    /// released either way.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("Error shutting down data connection to {}: {}", self.endpoint, e);
        }
        debug!("Closed data connection to {}", self.endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn dials_the_advertised_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = listener.local_addr().unwrap();

        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut connection = DataConnection::open(endpoint, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(connection.endpoint(), endpoint);
        connection.stream_mut().write_all(b"ping").await.unwrap();
        connection.close().await;

        assert_eq!(accept.await.unwrap(), b"ping");
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        // Bind then drop to get a port nobody listens on.
        let endpoint = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let err = DataConnection::open(endpoint, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Connect { .. } | TransferError::ConnectTimeout(_)
        ));
    }
}
