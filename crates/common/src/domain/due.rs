use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment-obligation record owned by the wider platform. This core never
/// creates or deletes dues; the reconciliation engine only flips `is_paid`
/// to true inside a verified-transfer transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Due {
    pub id: String,
    pub apartment_id: String,
    pub user_id: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub is_paid: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for fetching a due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDueRepoInput {
    pub due_id: String,
}

/// Read-only repository view of dues
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DueRepository: Send + Sync {
    /// Get a due by ID
    async fn get_due(&self, input: GetDueRepoInput) -> DomainResult<Option<Due>>;
}
