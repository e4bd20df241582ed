//! Client registry
//!
//! Tracks snapshots of active sessions for observability. The accept loop
//! owns the registry and hands a clone to every session.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::state::SessionSnapshot;

/// Registry for tracking active clients
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SocketAddr, SessionSnapshot>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `snapshot` unless `limit` sessions are already registered.
    pub async fn try_register(&self, snapshot: SessionSnapshot, limit: usize) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= limit {
            return false;
        }
        sessions.insert(snapshot.client_addr, snapshot);
        true
    }

    /// Replaces the snapshot of an already registered session.
    pub async fn update(&self, snapshot: SessionSnapshot) {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get_mut(&snapshot.client_addr) {
            *existing = snapshot;
        }
    }

    pub async fn remove(&self, addr: &SocketAddr) -> Option<SessionSnapshot> {
        self.sessions.write().await.remove(addr)
    }

    /// Active sessions ordered by address
    pub async fn list(&self) -> Vec<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        let mut snapshots: Vec<SessionSnapshot> = sessions.values().cloned().collect();
        snapshots.sort_by_key(|snapshot| snapshot.client_addr);
        snapshots
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(addr: &str, username: Option<&str>) -> SessionSnapshot {
        SessionSnapshot {
            client_addr: addr.parse().unwrap(),
            username: username.map(String::from),
            logged_in: false,
            working_directory: "/".into(),
        }
    }

    #[tokio::test]
    async fn enforces_the_session_limit() {
        let registry = SessionRegistry::new();
        assert!(registry.try_register(snapshot("127.0.0.1:5000", None), 1).await);
        assert!(!registry.try_register(snapshot("127.0.0.1:5001", None), 1).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn update_only_touches_registered_sessions() {
        let registry = SessionRegistry::new();
        registry.update(snapshot("127.0.0.1:5000", Some("ghost"))).await;
        assert!(registry.is_empty().await);

        registry.try_register(snapshot("127.0.0.1:5000", None), 10).await;
        registry.update(snapshot("127.0.0.1:5000", Some("alice"))).await;
        assert_eq!(registry.list().await[0].username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn list_is_sorted_and_remove_forgets() {
        let registry = SessionRegistry::new();
        registry.try_register(snapshot("127.0.0.1:6000", None), 10).await;
        registry.try_register(snapshot("127.0.0.1:5000", None), 10).await;

        let listed: Vec<u16> = registry
            .list()
            .await
            .iter()
            .map(|s| s.client_addr.port())
            .collect();
        assert_eq!(listed, vec![5000, 6000]);

        assert!(registry.remove(&"127.0.0.1:5000".parse().unwrap()).await.is_some());
        assert_eq!(registry.len().await, 1);
    }
}
