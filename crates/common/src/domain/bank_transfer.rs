use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a manually attested bank transfer.
/// `Pending` is the only non-terminal state; there is no re-review path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Verified,
    Rejected,
}

/// Terminal outcome of an admin decision. Kept separate from
/// `TransferStatus` so a decision can never re-enter `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDecision {
    Verified,
    Rejected,
}

impl From<TransferDecision> for TransferStatus {
    fn from(decision: TransferDecision) -> Self {
        match decision {
            TransferDecision::Verified => TransferStatus::Verified,
            TransferDecision::Rejected => TransferStatus::Rejected,
        }
    }
}

/// Bank transfer domain entity.
///
/// Invariant: `decided_by_user_id` and `decided_at` are set if and only if
/// `status` is not `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransfer {
    pub id: String,
    pub user_id: String,
    pub bank_account_id: String,
    pub amount: f64,
    pub transfer_date: DateTime<Utc>,
    pub reference_code: String,
    pub sender_name: String,
    pub description: Option<String>,
    pub receipt_ref: Option<String>,
    pub status: TransferStatus,
    pub status_note: Option<String>,
    pub decided_by_user_id: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub due_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Internal input with ID and reference code already generated by the
/// domain service. The created record is always `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBankTransferRepoInput {
    pub id: String,
    pub user_id: String,
    pub bank_account_id: String,
    pub amount: f64,
    pub transfer_date: DateTime<Utc>,
    pub reference_code: String,
    pub sender_name: String,
    pub description: Option<String>,
    pub receipt_ref: Option<String>,
    pub due_id: Option<String>,
}

/// Input for fetching a single transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBankTransferRepoInput {
    pub transfer_id: String,
}

/// Input for listing pending transfers whose destination account belongs
/// to the given apartment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPendingForApartmentRepoInput {
    pub apartment_id: String,
}

/// Input for listing a submitter's own transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTransfersByUserRepoInput {
    pub user_id: String,
}

/// Input for the atomic decide transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideTransferRepoInput {
    pub transfer_id: String,
    pub decision: TransferDecision,
    pub decided_by_user_id: String,
    pub status_note: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// Repository trait for bank transfer storage operations
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BankTransferRepository: Send + Sync {
    /// Persist a new pending transfer. The store enforces reference-code
    /// uniqueness as the ultimate collision guard.
    async fn create_transfer(
        &self,
        input: CreateBankTransferRepoInput,
    ) -> DomainResult<BankTransfer>;

    /// Get a transfer by ID
    async fn get_transfer(
        &self,
        input: GetBankTransferRepoInput,
    ) -> DomainResult<Option<BankTransfer>>;

    /// List pending transfers scoped to the apartment owning the
    /// destination bank account, newest first
    async fn list_pending_for_apartment(
        &self,
        input: ListPendingForApartmentRepoInput,
    ) -> DomainResult<Vec<BankTransfer>>;

    /// List a user's own transfers, newest first
    async fn list_transfers_by_user(
        &self,
        input: ListTransfersByUserRepoInput,
    ) -> DomainResult<Vec<BankTransfer>>;

    /// Atomically transition a `Pending` transfer to its decided status,
    /// stamping decider, timestamp and note. On `Verified` the linked due
    /// (if any) is marked paid in the same transaction; a failure partway
    /// leaves the transfer unchanged.
    ///
    /// Returns `None` when the transfer exists but its status was no
    /// longer `Pending` (compare-and-swap miss). A concurrent decide on
    /// the same transfer therefore resolves to exactly one `Some`.
    async fn decide_transfer(
        &self,
        input: DecideTransferRepoInput,
    ) -> DomainResult<Option<BankTransfer>>;
}
