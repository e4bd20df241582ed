//! Configuration management for the Ferrite FTP server
//!
//! Values are layered: an optional TOML file first, then environment
//! overrides prefixed with `FERRITE_FTP` (nested keys use `__`).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ferrite-ftpd.toml";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "FERRITE_FTP_CONFIG";

const ENV_PREFIX: &str = "FERRITE_FTP";

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the control listener binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Control connection port. `0` picks an ephemeral port.
    #[serde(default = "default_control_port")]
    pub control_port: u16,

    /// Base directory every session is confined to
    #[serde(default = "default_server_root")]
    pub server_root: String,

    /// When false, USER logs the client in without asking for a password
    #[serde(default = "default_true")]
    pub require_auth: bool,

    /// Whether SYST reveals the system type
    #[serde(default = "default_true")]
    pub allow_syst: bool,

    /// Text returned by SYST
    #[serde(default = "default_system_type")]
    pub system_type: String,

    /// Optional multi-line greeting sent before `220 Service Ready`
    #[serde(default)]
    pub banner: String,

    /// Connect timeout for active-mode data connections
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,

    #[serde(default = "default_max_clients")]
    pub max_clients: usize,

    /// Known accounts. An array of tables keeps user names case-sensitive.
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// A single `[[users]]` entry
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_control_port() -> u16 {
    2121
}

fn default_server_root() -> String {
    "./server_root".to_string()
}

fn default_true() -> bool {
    true
}

fn default_system_type() -> String {
    "Windows_NT".to_string()
}

fn default_connection_timeout_secs() -> u64 {
    10
}

fn default_max_command_length() -> usize {
    512
}

fn default_max_clients() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            control_port: default_control_port(),
            server_root: default_server_root(),
            require_auth: true,
            allow_syst: true,
            system_type: default_system_type(),
            banner: String::new(),
            connection_timeout_secs: default_connection_timeout_secs(),
            max_command_length: default_max_command_length(),
            max_clients: default_max_clients(),
            users: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `path` (optional) with environment overrides.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an in-memory TOML document. No environment overrides are applied.
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server_root.is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate user entry: {}",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// Bind address and control port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}
