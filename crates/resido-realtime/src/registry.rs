use crate::connection::ConnectionHandle;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct RegistryInner {
    /// principal -> live connection handle (at most one per principal)
    connections: HashMap<String, ConnectionHandle>,
    /// group -> principals currently joined
    groups: HashMap<String, HashSet<String>>,
    /// principal -> groups joined (reverse index for unregister)
    memberships: HashMap<String, HashSet<String>>,
}

impl RegistryInner {
    fn leave_all_groups(&mut self, principal_id: &str) {
        if let Some(groups) = self.memberships.remove(principal_id) {
            for group_id in groups {
                if let Some(members) = self.groups.get_mut(&group_id) {
                    members.remove(principal_id);
                    if members.is_empty() {
                        self.groups.remove(&group_id);
                    }
                }
            }
        }
    }
}

/// Live mapping from authenticated principals to their connection handle
/// and group memberships. Ephemeral and process-local: the reachability
/// source of truth lives only in memory and is lost on restart.
///
/// One lock guards connections, groups and the reverse index together, so
/// a reader can never observe a partially updated membership view.
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Register a principal's connection. A prior handle for the same
    /// principal is replaced (last connection wins) and its group
    /// memberships are cleared; the fresh connection joins groups itself.
    pub async fn register(&self, principal_id: &str, handle: ConnectionHandle) {
        let mut inner = self.inner.write().await;
        if inner.connections.contains_key(principal_id) {
            debug!(principal_id = %principal_id, "Replacing existing connection");
            inner.leave_all_groups(principal_id);
        }
        inner.connections.insert(principal_id.to_string(), handle);
    }

    /// Join a broadcast group. Idempotent; a no-op for principals without
    /// a registered connection.
    pub async fn join_group(&self, principal_id: &str, group_id: &str) {
        let mut inner = self.inner.write().await;
        if !inner.connections.contains_key(principal_id) {
            debug!(principal_id = %principal_id, group_id = %group_id, "Ignoring join for unregistered principal");
            return;
        }
        inner
            .groups
            .entry(group_id.to_string())
            .or_default()
            .insert(principal_id.to_string());
        inner
            .memberships
            .entry(principal_id.to_string())
            .or_default()
            .insert(group_id.to_string());
    }

    /// Remove a principal's connection and all of its group memberships.
    /// Safe to call for principals that were never registered.
    pub async fn unregister(&self, principal_id: &str) {
        let mut inner = self.inner.write().await;
        inner.leave_all_groups(principal_id);
        inner.connections.remove(principal_id);
    }

    /// Resolve a principal to its live connection handle
    pub async fn resolve(&self, principal_id: &str) -> Option<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner.connections.get(principal_id).cloned()
    }

    /// Snapshot of the handles currently joined to a group
    pub async fn resolve_group(&self, group_id: &str) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        match inner.groups.get(group_id) {
            Some(members) => members
                .iter()
                .filter_map(|principal_id| inner.connections.get(principal_id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    pub async fn is_registered(&self, principal_id: &str) -> bool {
        let inner = self.inner.read().await;
        inner.connections.contains_key(principal_id)
    }

    pub async fn connection_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
