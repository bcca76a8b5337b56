use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destination bank account for manual transfers. Read-only from this
/// core's perspective; `apartment_id` and `is_active` filter the accounts
/// a resident may select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub apartment_id: String,
    pub bank_name: String,
    pub account_holder: String,
    pub iban: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for fetching a bank account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBankAccountRepoInput {
    pub bank_account_id: String,
}

/// Input for listing active accounts of an apartment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListActiveBankAccountsRepoInput {
    pub apartment_id: String,
}

/// Read-only repository view of bank accounts
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    /// Get a bank account by ID
    async fn get_bank_account(
        &self,
        input: GetBankAccountRepoInput,
    ) -> DomainResult<Option<BankAccount>>;

    /// List active accounts belonging to an apartment
    async fn list_active_for_apartment(
        &self,
        input: ListActiveBankAccountsRepoInput,
    ) -> DomainResult<Vec<BankAccount>>;
}
