//! Credential storage
//!
//! In-memory username → password map built from the server configuration.

use crate::config::UserEntry;
use std::collections::HashMap;

/// Read-only credential store shared by every session
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
}

impl Credentials {
    pub fn from_entries(entries: &[UserEntry]) -> Self {
        let users = entries
            .iter()
            .map(|entry| (entry.username.clone(), entry.password.clone()))
            .collect();
        Self { users }
    }

    /// Expected password for `username`, if the account exists.
    pub fn expected_password(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
