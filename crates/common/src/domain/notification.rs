use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of event a notification describes. Drives the email template
/// selection in the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Payment,
    Maintenance,
    Announcement,
    Meeting,
    Document,
}

/// Notification domain entity. Owned by exactly one recipient; created by
/// the orchestrator and mutated only by the owning recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub related_entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Internal input with the ID already generated by the domain service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNotificationRepoInput {
    pub id: String,
    pub recipient_user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub related_entity_id: Option<String>,
}

/// Input for fetching a single notification, scoped to its recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNotificationRepoInput {
    pub notification_id: String,
    pub recipient_user_id: String,
}

/// Filter shared by the list and count operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFilter {
    pub recipient_user_id: String,
    pub is_read: Option<bool>,
    pub kind: Option<NotificationKind>,
}

/// Input for listing a page of notifications, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotificationsRepoInput {
    pub filter: NotificationFilter,
    pub skip: u64,
    pub take: u64,
}

/// Input for toggling the read flag, scoped to the recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkNotificationReadRepoInput {
    pub notification_id: String,
    pub recipient_user_id: String,
}

/// Input for deleting a notification, scoped to the recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNotificationRepoInput {
    pub notification_id: String,
    pub recipient_user_id: String,
}

/// Repository trait for notification storage operations.
/// Get/mark/delete are recipient-scoped: a caller that does not own the
/// record observes `None`, never a "forbidden" distinction.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification (unread)
    async fn create_notification(
        &self,
        input: CreateNotificationRepoInput,
    ) -> DomainResult<Notification>;

    /// Get a notification owned by the given recipient
    async fn get_notification(
        &self,
        input: GetNotificationRepoInput,
    ) -> DomainResult<Option<Notification>>;

    /// List notifications matching the filter, newest first
    async fn list_notifications(
        &self,
        input: ListNotificationsRepoInput,
    ) -> DomainResult<Vec<Notification>>;

    /// Count notifications matching the filter
    async fn count_notifications(&self, filter: NotificationFilter) -> DomainResult<u64>;

    /// Set the read flag; returns the updated notification, or `None` when
    /// the record is absent or owned by someone else
    async fn mark_notification_read(
        &self,
        input: MarkNotificationReadRepoInput,
    ) -> DomainResult<Option<Notification>>;

    /// Delete a notification; returns `false` when the record is absent or
    /// owned by someone else
    async fn delete_notification(
        &self,
        input: DeleteNotificationRepoInput,
    ) -> DomainResult<bool>;
}
