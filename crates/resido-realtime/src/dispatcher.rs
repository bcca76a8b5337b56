use crate::backend::BroadcastBackend;
use crate::connection::RealtimeEvent;
use common::domain::Notification;
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort delivery of already-persisted notifications to live
/// connections.
///
/// The dispatcher never surfaces errors to its caller: the durable copy is
/// safe in the store before dispatch runs, so a transport failure only
/// costs the live push. It persists nothing and mutates nothing.
pub struct RealtimeDispatcher {
    backend: Arc<dyn BroadcastBackend>,
}

impl RealtimeDispatcher {
    pub fn new(backend: Arc<dyn BroadcastBackend>) -> Self {
        Self { backend }
    }

    /// Push to one user; an unreachable user is silently skipped
    pub async fn dispatch_to_user(&self, user_id: &str, notification: &Notification) {
        let event = RealtimeEvent::notification(notification.clone());
        if let Err(err) = self.backend.publish_to_user(user_id, event).await {
            warn!(user_id = %user_id, error = %err, "Real-time push failed");
        }
    }

    /// Fan out to every connection in the group at dispatch time.
    /// Connections joining afterwards are not retroactively delivered.
    pub async fn dispatch_to_group(&self, group_id: &str, notification: &Notification) {
        let event = RealtimeEvent::notification(notification.clone());
        if let Err(err) = self.backend.publish_to_group(group_id, event).await {
            warn!(group_id = %group_id, error = %err, "Real-time group push failed");
        }
    }

    /// Per-user dispatch; one user's failure never blocks the others
    pub async fn dispatch_to_users(&self, user_ids: &[String], notification: &Notification) {
        debug!(recipients = user_ids.len(), "Dispatching to user list");
        for user_id in user_ids {
            self.dispatch_to_user(user_id, notification).await;
        }
    }
}
