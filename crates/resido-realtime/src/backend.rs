use crate::connection::RealtimeEvent;
use crate::registry::ConnectionRegistry;
use async_trait::async_trait;
use common::domain::DomainResult;
use std::sync::Arc;
use tracing::debug;

/// Pluggable broadcast backplane.
///
/// The in-process implementation reaches connections held by this process
/// only. Scaling the transport layer horizontally means substituting an
/// external pub/sub implementation here; nothing above this trait changes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BroadcastBackend: Send + Sync {
    /// Push an event to one principal's live connection, if any
    async fn publish_to_user(&self, user_id: &str, event: RealtimeEvent) -> DomainResult<()>;

    /// Push an event to every connection currently joined to a group
    async fn publish_to_group(&self, group_id: &str, event: RealtimeEvent) -> DomainResult<()>;
}

/// Single-process backend over the in-memory connection registry
pub struct InProcessBackend {
    registry: Arc<ConnectionRegistry>,
}

impl InProcessBackend {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl BroadcastBackend for InProcessBackend {
    async fn publish_to_user(&self, user_id: &str, event: RealtimeEvent) -> DomainResult<()> {
        match self.registry.resolve(user_id).await {
            Some(handle) => {
                if handle.send(event).is_err() {
                    // Peer hung up between resolve and send; its durable
                    // copy is already in the store.
                    debug!(user_id = %user_id, "Connection closed, dropping push");
                }
            }
            None => {
                debug!(user_id = %user_id, "No live connection, dropping push");
            }
        }
        Ok(())
    }

    async fn publish_to_group(&self, group_id: &str, event: RealtimeEvent) -> DomainResult<()> {
        let handles = self.registry.resolve_group(group_id).await;
        debug!(group_id = %group_id, connections = handles.len(), "Publishing to group");
        for handle in handles {
            if handle.send(event.clone()).is_err() {
                debug!(group_id = %group_id, "Connection closed, dropping push");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connection_channel;
    use chrono::Utc;
    use common::domain::{Notification, NotificationKind};

    fn sample_event() -> RealtimeEvent {
        RealtimeEvent::notification(Notification {
            id: "ntf-1".to_string(),
            recipient_user_id: "user-1".to_string(),
            kind: NotificationKind::Payment,
            title: "Dues reminder".to_string(),
            body: "March dues are ready".to_string(),
            is_read: false,
            related_entity_id: None,
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_publish_to_user_delivers() {
        let registry = Arc::new(ConnectionRegistry::new());
        let backend = InProcessBackend::new(registry.clone());
        let (handle, mut receiver) = connection_channel();
        registry.register("user-1", handle).await;

        let event = sample_event();
        backend
            .publish_to_user("user-1", event.clone())
            .await
            .unwrap();

        assert_eq!(receiver.recv().await, Some(event));
    }

    #[tokio::test]
    async fn test_publish_to_absent_user_is_silent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let backend = InProcessBackend::new(registry);

        // Never errors, never panics
        backend.publish_to_user("ghost", sample_event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_to_closed_connection_is_silent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let backend = InProcessBackend::new(registry.clone());
        let (handle, receiver) = connection_channel();
        registry.register("user-1", handle).await;
        drop(receiver);

        backend.publish_to_user("user-1", sample_event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_to_group_fans_out() {
        let registry = Arc::new(ConnectionRegistry::new());
        let backend = InProcessBackend::new(registry.clone());

        let mut receivers = Vec::new();
        for i in 0..3 {
            let principal = format!("user-{}", i);
            let (handle, receiver) = connection_channel();
            registry.register(&principal, handle).await;
            registry.join_group(&principal, "building-7").await;
            receivers.push(receiver);
        }

        let event = sample_event();
        backend
            .publish_to_group("building-7", event.clone())
            .await
            .unwrap();

        for receiver in &mut receivers {
            assert_eq!(receiver.recv().await, Some(event.clone()));
        }
    }
}
