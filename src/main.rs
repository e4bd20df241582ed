//! ferrite-ftpd - Entry Point
//!
//! Active-mode FTP server serving a single directory tree.

use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

use ferrite_ftpd::Server;
use ferrite_ftpd::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default filter
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(buf, "[{}] [{}] {}", timestamp, record.level(), record.args())
        })
        .init();

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    info!("Launching FTP server...");

    let server = Server::bind(config)
        .await
        .context("Server startup failed")?;

    tokio::select! {
        _ = server.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("Shutdown requested, stopping server");
        }
    }

    Ok(())
}
