use crate::domain::DomainResult;
use async_trait::async_trait;

/// Outbound email message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Output from a successful send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailOutput {
    pub message_id: String,
}

/// Outbound email channel, owned by the wider platform (SMTP-like
/// service). Sends are genuinely slow network I/O; callers fan out
/// concurrently and isolate per-recipient failures.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a single email message
    async fn send_email(&self, message: EmailMessage) -> DomainResult<SendEmailOutput>;
}
