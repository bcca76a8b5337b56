use async_trait::async_trait;
use common::domain::{
    CreateNotificationRepoInput, DeleteNotificationRepoInput, DomainResult,
    GetNotificationRepoInput, ListNotificationsRepoInput, MarkNotificationReadRepoInput,
    Notification, NotificationFilter, NotificationRepository,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of `NotificationRepository` backed by a
/// HashMap. Used by integration tests and single-process deployments.
pub struct InMemoryNotificationRepository {
    notifications: RwLock<HashMap<String, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryNotificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(notification: &Notification, filter: &NotificationFilter) -> bool {
    notification.recipient_user_id == filter.recipient_user_id
        && filter
            .is_read
            .map(|is_read| notification.is_read == is_read)
            .unwrap_or(true)
        && filter
            .kind
            .map(|kind| notification.kind == kind)
            .unwrap_or(true)
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create_notification(
        &self,
        input: CreateNotificationRepoInput,
    ) -> DomainResult<Notification> {
        let notification = Notification {
            id: input.id.clone(),
            recipient_user_id: input.recipient_user_id,
            kind: input.kind,
            title: input.title,
            body: input.body,
            is_read: false,
            related_entity_id: input.related_entity_id,
            created_at: chrono::Utc::now(),
        };
        let mut notifications = self.notifications.write().await;
        notifications.insert(input.id, notification.clone());
        Ok(notification)
    }

    async fn get_notification(
        &self,
        input: GetNotificationRepoInput,
    ) -> DomainResult<Option<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .get(&input.notification_id)
            .filter(|notification| notification.recipient_user_id == input.recipient_user_id)
            .cloned())
    }

    async fn list_notifications(
        &self,
        input: ListNotificationsRepoInput,
    ) -> DomainResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut matching: Vec<Notification> = notifications
            .values()
            .filter(|notification| matches(notification, &input.filter))
            .cloned()
            .collect();
        // Newest first; id breaks created_at ties (xid is time-sortable)
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matching
            .into_iter()
            .skip(input.skip as usize)
            .take(input.take as usize)
            .collect())
    }

    async fn count_notifications(&self, filter: NotificationFilter) -> DomainResult<u64> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .values()
            .filter(|notification| matches(notification, &filter))
            .count() as u64)
    }

    async fn mark_notification_read(
        &self,
        input: MarkNotificationReadRepoInput,
    ) -> DomainResult<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&input.notification_id) {
            Some(notification)
                if notification.recipient_user_id == input.recipient_user_id =>
            {
                notification.is_read = true;
                Ok(Some(notification.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_notification(
        &self,
        input: DeleteNotificationRepoInput,
    ) -> DomainResult<bool> {
        let mut notifications = self.notifications.write().await;
        let owned = notifications
            .get(&input.notification_id)
            .map(|notification| notification.recipient_user_id == input.recipient_user_id)
            .unwrap_or(false);
        if owned {
            notifications.remove(&input.notification_id);
        }
        Ok(owned)
    }
}
