use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Bank transfer not found: {0}")]
    TransferNotFound(String),

    #[error("Due not found: {0}")]
    DueNotFound(String),

    #[error("Invalid transfer state: {0}")]
    InvalidTransferState(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}
