use anyhow::anyhow;
use async_trait::async_trait;
use common::domain::{
    BankAccount, BankAccountRepository, BankTransfer, BankTransferRepository,
    CreateBankTransferRepoInput, DecideTransferRepoInput, DomainError, DomainResult, Due,
    DueRepository, GetBankAccountRepoInput, GetBankTransferRepoInput, GetDueRepoInput,
    ListActiveBankAccountsRepoInput, ListPendingForApartmentRepoInput,
    ListTransfersByUserRepoInput, TransferDecision, TransferStatus,
};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerInner {
    transfers: HashMap<String, BankTransfer>,
    reference_codes: HashSet<String>,
    dues: HashMap<String, Due>,
    accounts: HashMap<String, BankAccount>,
}

/// In-memory ledger holding transfers, dues and bank accounts behind one
/// lock, so `decide_transfer` can apply the status transition and the due
/// cascade as a genuinely atomic unit.
pub struct InMemoryLedger {
    inner: RwLock<LedgerInner>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerInner::default()),
        }
    }

    /// Seed a due (dues are owned by the wider platform)
    pub async fn insert_due(&self, due: Due) {
        let mut inner = self.inner.write().await;
        inner.dues.insert(due.id.clone(), due);
    }

    /// Seed a bank account (accounts are owned by the wider platform)
    pub async fn insert_account(&self, account: BankAccount) {
        let mut inner = self.inner.write().await;
        inner.accounts.insert(account.id.clone(), account);
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(transfers: &mut [BankTransfer]) {
    transfers.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl BankTransferRepository for InMemoryLedger {
    async fn create_transfer(
        &self,
        input: CreateBankTransferRepoInput,
    ) -> DomainResult<BankTransfer> {
        let mut inner = self.inner.write().await;
        if !inner.reference_codes.insert(input.reference_code.clone()) {
            return Err(DomainError::RepositoryError(anyhow!(
                "unique constraint violated on reference code {}",
                input.reference_code
            )));
        }
        let transfer = BankTransfer {
            id: input.id.clone(),
            user_id: input.user_id,
            bank_account_id: input.bank_account_id,
            amount: input.amount,
            transfer_date: input.transfer_date,
            reference_code: input.reference_code,
            sender_name: input.sender_name,
            description: input.description,
            receipt_ref: input.receipt_ref,
            status: TransferStatus::Pending,
            status_note: None,
            decided_by_user_id: None,
            decided_at: None,
            due_id: input.due_id,
            created_at: chrono::Utc::now(),
        };
        inner.transfers.insert(input.id, transfer.clone());
        Ok(transfer)
    }

    async fn get_transfer(
        &self,
        input: GetBankTransferRepoInput,
    ) -> DomainResult<Option<BankTransfer>> {
        let inner = self.inner.read().await;
        Ok(inner.transfers.get(&input.transfer_id).cloned())
    }

    async fn list_pending_for_apartment(
        &self,
        input: ListPendingForApartmentRepoInput,
    ) -> DomainResult<Vec<BankTransfer>> {
        let inner = self.inner.read().await;
        let mut pending: Vec<BankTransfer> = inner
            .transfers
            .values()
            .filter(|transfer| transfer.status == TransferStatus::Pending)
            .filter(|transfer| {
                inner
                    .accounts
                    .get(&transfer.bank_account_id)
                    .map(|account| account.apartment_id == input.apartment_id)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        newest_first(&mut pending);
        Ok(pending)
    }

    async fn list_transfers_by_user(
        &self,
        input: ListTransfersByUserRepoInput,
    ) -> DomainResult<Vec<BankTransfer>> {
        let inner = self.inner.read().await;
        let mut own: Vec<BankTransfer> = inner
            .transfers
            .values()
            .filter(|transfer| transfer.user_id == input.user_id)
            .cloned()
            .collect();
        newest_first(&mut own);
        Ok(own)
    }

    async fn decide_transfer(
        &self,
        input: DecideTransferRepoInput,
    ) -> DomainResult<Option<BankTransfer>> {
        let mut inner = self.inner.write().await;

        // Compare-and-swap on status under the write lock
        let due_id = match inner.transfers.get(&input.transfer_id) {
            Some(transfer) if transfer.status == TransferStatus::Pending => {
                transfer.due_id.clone()
            }
            _ => return Ok(None),
        };

        // Apply the cascade before touching the transfer, so a missing
        // due leaves the transfer in its prior state
        if input.decision == TransferDecision::Verified {
            if let Some(due_id) = &due_id {
                match inner.dues.get_mut(due_id) {
                    Some(due) => due.is_paid = true,
                    None => return Err(DomainError::DueNotFound(due_id.clone())),
                }
            }
        }

        let updated = inner.transfers.get_mut(&input.transfer_id).map(|transfer| {
            transfer.status = input.decision.into();
            transfer.status_note = input.status_note.clone();
            transfer.decided_by_user_id = Some(input.decided_by_user_id.clone());
            transfer.decided_at = Some(input.decided_at);
            transfer.clone()
        });
        Ok(updated)
    }
}

#[async_trait]
impl DueRepository for InMemoryLedger {
    async fn get_due(&self, input: GetDueRepoInput) -> DomainResult<Option<Due>> {
        let inner = self.inner.read().await;
        Ok(inner.dues.get(&input.due_id).cloned())
    }
}

#[async_trait]
impl BankAccountRepository for InMemoryLedger {
    async fn get_bank_account(
        &self,
        input: GetBankAccountRepoInput,
    ) -> DomainResult<Option<BankAccount>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&input.bank_account_id).cloned())
    }

    async fn list_active_for_apartment(
        &self,
        input: ListActiveBankAccountsRepoInput,
    ) -> DomainResult<Vec<BankAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .filter(|account| account.is_active && account.apartment_id == input.apartment_id)
            .cloned()
            .collect())
    }
}
