use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::client::{Session, SessionContext, SessionRegistry, handle_client};
use crate::config::ServerConfig;
use crate::protocol::responses::{self, Reply, send_reply};

pub struct Server {
    registry: SessionRegistry,
    listener: TcpListener,
    ctx: Arc<SessionContext>,
}

impl Server {
    /// Prepares the server root and binds the control listener.
    pub async fn bind(config: ServerConfig) -> std::io::Result<Self> {
        let socket = config.control_socket();
        let ctx = SessionContext::new(config)?;

        let listener = TcpListener::bind(&socket).await.inspect_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            registry: SessionRegistry::new(),
            listener,
            ctx: Arc::new(ctx),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle onto the active-session registry
    pub fn registry(&self) -> SessionRegistry {
        self.registry.clone()
    }

    /// Accepts connections forever, one task per client.
    pub async fn run(self) {
        let max_clients = self.ctx.config().max_clients;
        info!(
            "Starting FTP server on {} (max {} clients)",
            self.ctx.config().control_socket(),
            max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New connection from {}", addr);
                    let snapshot = Session::new(addr).snapshot();
                    if !self.registry.try_register(snapshot, max_clients).await {
                        warn!("Rejecting {}: {} clients already connected", addr, max_clients);
                        tokio::spawn(reject_client(stream, addr));
                        continue;
                    }

                    let registry = self.registry.clone();
                    let ctx = Arc::clone(&self.ctx);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(handle_client(stream, addr, registry, ctx));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

async fn reject_client(mut stream: TcpStream, addr: SocketAddr) {
    let reply = Reply::new(responses::SERVICE_UNAVAILABLE, "Too many connections");
    if let Err(e) = send_reply(&mut stream, &reply).await {
        warn!("Failed to notify rejected client {}: {}", addr, e);
    }
}
