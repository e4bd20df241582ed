//! Module `client`
//!
//! Defines the `Session` struct holding the per-connection protocol state:
//! authentication, working directory, transfer type and data-connection mode.
//!
//! A `Session` is owned by the task driving its control connection and is
//! only ever borrowed by that task, so it carries no locks. Observers read
//! [`SessionSnapshot`] copies published to the registry instead.

use std::net::{Ipv4Addr, SocketAddr};

use crate::transfer::{DataConnectionMode, TransferType};

/// Authentication axis of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    AwaitingPassword,
    Authenticated,
}

/// Represents the state of a connected FTP client.
#[derive(Debug)]
pub struct Session {
    client_addr: SocketAddr,
    username: Option<String>,
    auth_state: AuthState,
    current_virtual_path: String,
    transfer_type: TransferType,
    data_mode: DataConnectionMode,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            client_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            username: None,
            auth_state: AuthState::Unauthenticated,
            current_virtual_path: "/".to_string(),
            transfer_type: TransferType::Binary,
            data_mode: DataConnectionMode::None,
        }
    }
}

/// Copy of the observable parts of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub client_addr: SocketAddr,
    pub username: Option<String>,
    pub logged_in: bool,
    pub working_directory: String,
}

impl Session {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr,
            ..Self::default()
        }
    }

    // --------------------
    // Authentication
    // --------------------

    /// Records a new identity and discards any previous login.
    ///
    /// With `require_auth` the session waits for PASS; otherwise the user
    /// is logged in immediately.
    pub fn begin_login(&mut self, username: Option<String>, require_auth: bool) {
        self.username = username;
        self.auth_state = if require_auth {
            AuthState::AwaitingPassword
        } else {
            AuthState::Authenticated
        };
    }

    /// Marks the current identity as authenticated.
    pub fn complete_login(&mut self) {
        self.auth_state = AuthState::Authenticated;
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    /// Returns whether the client has successfully logged in.
    pub fn is_logged_in(&self) -> bool {
        self.auth_state == AuthState::Authenticated
    }

    /// Returns the username of the client if set. Set does not imply
    /// authenticated.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    // --------------------
    // Working directory
    // --------------------

    /// Current directory relative to the server root, always starting with `/`.
    pub fn current_virtual_path(&self) -> &str {
        &self.current_virtual_path
    }

    pub fn set_current_virtual_path(&mut self, path: String) {
        self.current_virtual_path = path;
    }

    // --------------------
    // Transfer settings
    // --------------------

    pub fn transfer_type(&self) -> TransferType {
        self.transfer_type
    }

    pub fn set_transfer_type(&mut self, transfer_type: TransferType) {
        self.transfer_type = transfer_type;
    }

    pub fn data_mode(&self) -> DataConnectionMode {
        self.data_mode
    }

    /// Stores an active-mode endpoint, replacing any earlier one.
    pub fn set_active_endpoint(&mut self, endpoint: SocketAddr) {
        self.data_mode = DataConnectionMode::Active(endpoint);
    }

    /// Consumes the negotiated endpoint. Each PORT serves one transfer.
    pub fn take_data_endpoint(&mut self) -> Option<SocketAddr> {
        match std::mem::take(&mut self.data_mode) {
            DataConnectionMode::Active(endpoint) => Some(endpoint),
            DataConnectionMode::None => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            client_addr: self.client_addr,
            username: self.username.clone(),
            logged_in: self.is_logged_in(),
            working_directory: self.current_virtual_path.clone(),
        }
    }
}
