use crate::config::ServiceConfig;
use crate::domain::templates;
use common::domain::{
    CreateNotificationRepoInput, DomainError, DomainResult, GetUserInput,
    ListApartmentMembersInput, Notification, NotificationKind, NotificationRepository,
    UserDirectory,
};
use common::email::{EmailMessage, EmailSender};
use futures::future::join_all;
use garde::Validate;
use resido_realtime::RealtimeDispatcher;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Who a notification is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelection {
    /// One user
    User(String),
    /// An explicit list of users
    Users(Vec<String>),
    /// Every member of the apartment named in the request
    AllResidents,
}

/// Service request for sending a notification
#[derive(Debug, Clone, Validate)]
pub struct NotifyRequest {
    #[garde(skip)]
    pub recipients: RecipientSelection,
    #[garde(skip)]
    pub kind: NotificationKind,
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub body: String,
    #[garde(skip)]
    pub related_entity_id: Option<String>,
    #[garde(skip)]
    pub apartment_id: Option<String>,
    #[garde(skip)]
    pub send_email: bool,
}

/// Resolved recipient; the email is known up front only when the
/// selection was expanded through the user directory
struct ResolvedRecipient {
    user_id: String,
    email: Option<String>,
}

/// Single entry point for notifying one user, an explicit list of users,
/// or every member of an apartment.
///
/// Persistence happens before real-time dispatch for every recipient, so
/// a client that receives a live push can always re-fetch the stored
/// notification. The email path runs after both and is best-effort: its
/// failures are logged and never fail the call.
pub struct NotificationOrchestrator {
    notification_repository: Arc<dyn NotificationRepository>,
    user_directory: Arc<dyn UserDirectory>,
    dispatcher: Arc<RealtimeDispatcher>,
    email_sender: Arc<dyn EmailSender>,
    config: ServiceConfig,
}

impl NotificationOrchestrator {
    pub fn new(
        notification_repository: Arc<dyn NotificationRepository>,
        user_directory: Arc<dyn UserDirectory>,
        dispatcher: Arc<RealtimeDispatcher>,
        email_sender: Arc<dyn EmailSender>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            notification_repository,
            user_directory,
            dispatcher,
            email_sender,
            config,
        }
    }

    /// Persist, dispatch and (optionally) email a notification
    #[instrument(skip(self, request), fields(kind = ?request.kind, send_email = request.send_email))]
    pub async fn notify(&self, request: NotifyRequest) -> DomainResult<Vec<Notification>> {
        common::garde::validate_struct(&request)?;

        let recipients = self.resolve_recipients(&request).await?;
        if recipients.is_empty() {
            debug!("Recipient selection resolved to nobody, nothing to do");
            return Ok(Vec::new());
        }

        // Persist one row per recipient before any dispatch
        let mut created = Vec::with_capacity(recipients.len());
        for recipient in &recipients {
            let notification = self
                .notification_repository
                .create_notification(CreateNotificationRepoInput {
                    id: xid::new().to_string(),
                    recipient_user_id: recipient.user_id.clone(),
                    kind: request.kind,
                    title: request.title.clone(),
                    body: request.body.clone(),
                    related_entity_id: request.related_entity_id.clone(),
                })
                .await?;
            created.push(notification);
        }

        // Real-time push, shaped by the selection
        match &request.recipients {
            RecipientSelection::User(user_id) => {
                self.dispatcher.dispatch_to_user(user_id, &created[0]).await;
            }
            RecipientSelection::AllResidents => {
                // Checked during recipient resolution
                let apartment_id = request.apartment_id.as_deref().unwrap_or_default();
                self.dispatcher
                    .dispatch_to_group(apartment_id, &created[0])
                    .await;
            }
            RecipientSelection::Users(_) => {
                let user_ids: Vec<String> =
                    recipients.iter().map(|r| r.user_id.clone()).collect();
                self.dispatcher.dispatch_to_users(&user_ids, &created[0]).await;
            }
        }

        if request.send_email && self.config.email_enabled {
            self.send_emails(&request, &recipients).await;
        }

        info!(recipients = created.len(), "Notification delivered");
        Ok(created)
    }

    async fn resolve_recipients(
        &self,
        request: &NotifyRequest,
    ) -> DomainResult<Vec<ResolvedRecipient>> {
        match &request.recipients {
            RecipientSelection::User(user_id) => {
                if user_id.is_empty() {
                    return Err(DomainError::ValidationError(
                        "Recipient user ID cannot be empty".to_string(),
                    ));
                }
                Ok(vec![ResolvedRecipient {
                    user_id: user_id.clone(),
                    email: None,
                }])
            }
            RecipientSelection::Users(user_ids) => {
                if user_ids.is_empty() || user_ids.iter().any(String::is_empty) {
                    return Err(DomainError::ValidationError(
                        "Recipient list cannot be empty".to_string(),
                    ));
                }
                Ok(user_ids
                    .iter()
                    .map(|user_id| ResolvedRecipient {
                        user_id: user_id.clone(),
                        email: None,
                    })
                    .collect())
            }
            RecipientSelection::AllResidents => {
                let apartment_id = request.apartment_id.as_deref().ok_or_else(|| {
                    DomainError::ValidationError(
                        "Notifying all residents requires an apartment ID".to_string(),
                    )
                })?;
                let members = self
                    .user_directory
                    .list_apartment_members(ListApartmentMembersInput {
                        apartment_id: apartment_id.to_string(),
                    })
                    .await?;
                Ok(members
                    .into_iter()
                    .map(|profile| ResolvedRecipient {
                        user_id: profile.id,
                        email: Some(profile.email),
                    })
                    .collect())
            }
        }
    }

    /// Fan the rendered email out to every recipient concurrently.
    /// Failures are isolated per recipient and only logged; by the time
    /// this runs the notifications are durable and dispatched.
    async fn send_emails(&self, request: &NotifyRequest, recipients: &[ResolvedRecipient]) {
        let content = templates::render(request.kind, &request.title, &request.body);

        let sends = recipients.iter().map(|recipient| {
            let content = content.clone();
            async move {
                let address = match &recipient.email {
                    Some(email) => email.clone(),
                    None => match self
                        .user_directory
                        .get_user(GetUserInput {
                            user_id: recipient.user_id.clone(),
                        })
                        .await
                    {
                        Ok(Some(profile)) => profile.email,
                        Ok(None) => {
                            warn!(user_id = %recipient.user_id, "Recipient not in user directory, skipping email");
                            return false;
                        }
                        Err(err) => {
                            warn!(user_id = %recipient.user_id, error = %err, "User lookup failed, skipping email");
                            return false;
                        }
                    },
                };

                match self
                    .email_sender
                    .send_email(EmailMessage {
                        to: address,
                        subject: content.subject,
                        html_body: content.html_body,
                    })
                    .await
                {
                    Ok(output) => {
                        debug!(user_id = %recipient.user_id, message_id = %output.message_id, "Email sent");
                        true
                    }
                    Err(err) => {
                        warn!(user_id = %recipient.user_id, error = %err, "Email send failed");
                        false
                    }
                }
            }
        });

        let results = join_all(sends).await;
        let sent = results.iter().filter(|ok| **ok).count();
        debug!(sent = sent, total = results.len(), "Email fan-out finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use common::auth::Role;
    use common::domain::{MockNotificationRepository, MockUserDirectory, UserProfile};
    use common::email::{MockEmailSender, SendEmailOutput};
    use resido_realtime::MockBroadcastBackend;

    fn dispatcher(backend: MockBroadcastBackend) -> Arc<RealtimeDispatcher> {
        Arc::new(RealtimeDispatcher::new(Arc::new(backend)))
    }

    fn creating_repo() -> MockNotificationRepository {
        let mut mock = MockNotificationRepository::new();
        mock.expect_create_notification().returning(|input| {
            Ok(Notification {
                id: input.id,
                recipient_user_id: input.recipient_user_id,
                kind: input.kind,
                title: input.title,
                body: input.body,
                is_read: false,
                related_entity_id: input.related_entity_id,
                created_at: chrono::Utc::now(),
            })
        });
        mock
    }

    fn member(id: &str, email: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: id.to_string(),
            email: email.to_string(),
            apartment_id: Some("apt-7".to_string()),
            role: Role::Resident,
        }
    }

    fn request(recipients: RecipientSelection) -> NotifyRequest {
        NotifyRequest {
            recipients,
            kind: NotificationKind::Announcement,
            title: "Water outage".to_string(),
            body: "Tuesday morning".to_string(),
            related_entity_id: None,
            apartment_id: None,
            send_email: false,
        }
    }

    #[tokio::test]
    async fn test_notify_single_user_persists_then_dispatches() {
        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_user()
            .withf(|user_id: &str, _| user_id == "user-1")
            .times(1)
            .returning(|_, _| Ok(()));

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(backend),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let created = orchestrator
            .notify(request(RecipientSelection::User("user-1".to_string())))
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].recipient_user_id, "user-1");
        assert!(!created[0].is_read);
    }

    #[tokio::test]
    async fn test_notify_missing_title_fails_validation() {
        let orchestrator = NotificationOrchestrator::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(MockBroadcastBackend::new()),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let mut bad = request(RecipientSelection::User("user-1".to_string()));
        bad.title = String::new();

        let result = orchestrator.notify(bad).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_notify_all_requires_apartment() {
        let orchestrator = NotificationOrchestrator::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(MockBroadcastBackend::new()),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let result = orchestrator
            .notify(request(RecipientSelection::AllResidents))
            .await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_notify_all_expands_members_and_dispatches_to_group() {
        let mut directory = MockUserDirectory::new();
        directory.expect_list_apartment_members().returning(|_| {
            Ok(vec![
                member("user-1", "a@example.com"),
                member("user-2", "b@example.com"),
                member("user-3", "c@example.com"),
            ])
        });

        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_group()
            .withf(|group_id: &str, _| group_id == "apt-7")
            .times(1)
            .returning(|_, _| Ok(()));

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(directory),
            dispatcher(backend),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let mut req = request(RecipientSelection::AllResidents);
        req.apartment_id = Some("apt-7".to_string());

        let created = orchestrator.notify(req).await.unwrap();
        assert_eq!(created.len(), 3);
    }

    #[tokio::test]
    async fn test_notify_empty_user_list_fails_validation() {
        let orchestrator = NotificationOrchestrator::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(MockBroadcastBackend::new()),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let result = orchestrator
            .notify(request(RecipientSelection::Users(Vec::new())))
            .await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_notify_user_list_dispatches_per_user() {
        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_user()
            .times(2)
            .returning(|_, _| Ok(()));

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(backend),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let created = orchestrator
            .notify(request(RecipientSelection::Users(vec![
                "user-1".to_string(),
                "user-2".to_string(),
            ])))
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_notify() {
        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_user()
            .returning(|_, _| Ok(()));

        let mut directory = MockUserDirectory::new();
        directory.expect_get_user().returning(|input| {
            Ok(Some(member(&input.user_id, "user@example.com")))
        });

        let mut email = MockEmailSender::new();
        email
            .expect_send_email()
            .times(1)
            .returning(|_| Err(DomainError::RepositoryError(anyhow!("smtp down"))));

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(directory),
            dispatcher(backend),
            Arc::new(email),
            ServiceConfig::default(),
        );

        let mut req = request(RecipientSelection::User("user-1".to_string()));
        req.send_email = true;

        let created = orchestrator.notify(req).await.unwrap();
        assert_eq!(created.len(), 1);
    }

    #[tokio::test]
    async fn test_email_disabled_by_config_sends_nothing() {
        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_user()
            .returning(|_, _| Ok(()));

        // Email sender would panic on unexpected call
        let email = MockEmailSender::new();

        let mut config = ServiceConfig::default();
        config.email_enabled = false;

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(MockUserDirectory::new()),
            dispatcher(backend),
            Arc::new(email),
            config,
        );

        let mut req = request(RecipientSelection::User("user-1".to_string()));
        req.send_email = true;

        orchestrator.notify(req).await.unwrap();
    }

    #[tokio::test]
    async fn test_emails_use_kind_specific_template() {
        let mut backend = MockBroadcastBackend::new();
        backend
            .expect_publish_to_user()
            .returning(|_, _| Ok(()));

        let mut directory = MockUserDirectory::new();
        directory.expect_get_user().returning(|input| {
            Ok(Some(member(&input.user_id, "user@example.com")))
        });

        let mut email = MockEmailSender::new();
        email
            .expect_send_email()
            .withf(|message: &EmailMessage| {
                message.to == "user@example.com" && message.subject.starts_with("Payment update")
            })
            .times(1)
            .returning(|_| {
                Ok(SendEmailOutput {
                    message_id: "msg-1".to_string(),
                })
            });

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(creating_repo()),
            Arc::new(directory),
            dispatcher(backend),
            Arc::new(email),
            ServiceConfig::default(),
        );

        let mut req = request(RecipientSelection::User("user-1".to_string()));
        req.kind = NotificationKind::Payment;
        req.send_email = true;

        orchestrator.notify(req).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_create_notification()
            .returning(|_| Err(DomainError::RepositoryError(anyhow!("database down"))));

        let orchestrator = NotificationOrchestrator::new(
            Arc::new(repo),
            Arc::new(MockUserDirectory::new()),
            dispatcher(MockBroadcastBackend::new()),
            Arc::new(MockEmailSender::new()),
            ServiceConfig::default(),
        );

        let result = orchestrator
            .notify(request(RecipientSelection::User("user-1".to_string())))
            .await;
        assert!(matches!(result, Err(DomainError::RepositoryError(_))));
    }
}
