//! Shared session context
//!
//! Read-only state every session consults: configuration, credentials and
//! the canonical server root.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::config::ServerConfig;

#[derive(Debug)]
pub struct SessionContext {
    config: ServerConfig,
    credentials: Credentials,
    server_root: PathBuf,
}

impl SessionContext {
    /// Creates the server root if needed and resolves it to a canonical path.
    pub fn new(config: ServerConfig) -> std::io::Result<Self> {
        let root = config.server_root_path();
        std::fs::create_dir_all(&root)?;
        let server_root = root.canonicalize()?;
        info!("Server root directory: {}", server_root.display());

        let credentials = Credentials::from_entries(&config.users);
        info!("Loaded {} user account(s)", credentials.len());
        if config.require_auth && credentials.is_empty() {
            warn!("Authentication is required but no users are configured; every login will fail");
        }

        Ok(Self {
            config,
            credentials,
            server_root,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn server_root(&self) -> &Path {
        &self.server_root
    }

    pub fn connect_timeout(&self) -> Duration {
        self.config.connection_timeout()
    }
}
