use crate::config::ServiceConfig;
use common::auth::UserContext;
use common::domain::{
    DeleteNotificationRepoInput, DomainError, DomainResult, GetNotificationRepoInput,
    ListNotificationsRepoInput, MarkNotificationReadRepoInput, Notification, NotificationFilter,
    NotificationKind, NotificationRepository,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Service request for listing a page of the caller's notifications
#[derive(Debug, Clone, Validate)]
pub struct ListNotificationsRequest {
    #[garde(skip)]
    pub ctx: UserContext,
    #[garde(skip)]
    pub is_read: Option<bool>,
    #[garde(skip)]
    pub kind: Option<NotificationKind>,
    #[garde(range(min = 1))]
    pub page: u64,
    #[garde(skip)]
    pub limit: Option<u64>,
}

/// One page of notifications, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub total_count: u64,
    pub total_pages: u64,
    pub page: u64,
    pub limit: u64,
}

/// Caller-facing notification operations. Every operation is scoped to
/// the authenticated recipient; a notification owned by someone else is
/// indistinguishable from one that does not exist.
pub struct NotificationService {
    notification_repository: Arc<dyn NotificationRepository>,
    config: ServiceConfig,
}

impl NotificationService {
    pub fn new(
        notification_repository: Arc<dyn NotificationRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            notification_repository,
            config,
        }
    }

    /// List the caller's notifications, newest first, with pagination
    #[instrument(skip(self, request), fields(user_id = %request.ctx.user_id, page = request.page))]
    pub async fn list_notifications(
        &self,
        request: ListNotificationsRequest,
    ) -> DomainResult<NotificationPage> {
        common::garde::validate_struct(&request)?;

        let limit = request
            .limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        let page = request.page;

        let filter = NotificationFilter {
            recipient_user_id: request.ctx.user_id.clone(),
            is_read: request.is_read,
            kind: request.kind,
        };

        let total_count = self
            .notification_repository
            .count_notifications(filter.clone())
            .await?;

        let items = self
            .notification_repository
            .list_notifications(ListNotificationsRepoInput {
                filter,
                skip: (page - 1) * limit,
                take: limit,
            })
            .await?;

        let total_pages = total_count.div_ceil(limit);

        debug!(
            total_count = total_count,
            returned = items.len(),
            "Listed notifications"
        );

        Ok(NotificationPage {
            items,
            total_count,
            total_pages,
            page,
            limit,
        })
    }

    /// Get one of the caller's notifications
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id, notification_id = %notification_id))]
    pub async fn get_notification(
        &self,
        ctx: &UserContext,
        notification_id: &str,
    ) -> DomainResult<Notification> {
        self.notification_repository
            .get_notification(GetNotificationRepoInput {
                notification_id: notification_id.to_string(),
                recipient_user_id: ctx.user_id.clone(),
            })
            .await?
            .ok_or_else(|| DomainError::NotificationNotFound(notification_id.to_string()))
    }

    /// Mark one of the caller's notifications as read
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id, notification_id = %notification_id))]
    pub async fn mark_notification_read(
        &self,
        ctx: &UserContext,
        notification_id: &str,
    ) -> DomainResult<Notification> {
        self.notification_repository
            .mark_notification_read(MarkNotificationReadRepoInput {
                notification_id: notification_id.to_string(),
                recipient_user_id: ctx.user_id.clone(),
            })
            .await?
            .ok_or_else(|| DomainError::NotificationNotFound(notification_id.to_string()))
    }

    /// Delete one of the caller's notifications
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id, notification_id = %notification_id))]
    pub async fn delete_notification(
        &self,
        ctx: &UserContext,
        notification_id: &str,
    ) -> DomainResult<()> {
        let deleted = self
            .notification_repository
            .delete_notification(DeleteNotificationRepoInput {
                notification_id: notification_id.to_string(),
                recipient_user_id: ctx.user_id.clone(),
            })
            .await?;

        if deleted {
            Ok(())
        } else {
            Err(DomainError::NotificationNotFound(
                notification_id.to_string(),
            ))
        }
    }

    /// Number of unread notifications for the caller (badge counter)
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn unread_count(&self, ctx: &UserContext) -> DomainResult<u64> {
        self.notification_repository
            .count_notifications(NotificationFilter {
                recipient_user_id: ctx.user_id.clone(),
                is_read: Some(false),
                kind: None,
            })
            .await
    }
}
