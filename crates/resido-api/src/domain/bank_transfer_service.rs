use crate::domain::reference_code::ReferenceCodeProvider;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common::auth::{Role, UserContext};
use common::blob::ReceiptStore;
use common::domain::{
    BankAccount, BankAccountRepository, BankTransfer, BankTransferRepository,
    CreateBankTransferRepoInput, DecideTransferRepoInput, DomainError, DomainResult,
    GetBankAccountRepoInput, GetBankTransferRepoInput, ListActiveBankAccountsRepoInput,
    ListPendingForApartmentRepoInput, ListTransfersByUserRepoInput, TransferDecision,
    TransferStatus,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Service request for a resident attesting a bank transfer
#[derive(Debug, Clone, Validate)]
pub struct SubmitTransferRequest {
    #[garde(skip)]
    pub ctx: UserContext,
    #[garde(length(min = 1))]
    pub bank_account_id: String,
    #[garde(custom(positive_amount))]
    pub amount: f64,
    #[garde(custom(required_date))]
    pub transfer_date: Option<DateTime<Utc>>,
    #[garde(length(min = 1))]
    pub sender_name: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub receipt: Option<Bytes>,
    #[garde(skip)]
    pub due_id: Option<String>,
}

/// Service request for an admin decision on a pending transfer
#[derive(Debug, Clone, Validate)]
pub struct DecideTransferRequest {
    #[garde(skip)]
    pub ctx: UserContext,
    #[garde(length(min = 1))]
    pub transfer_id: String,
    #[garde(skip)]
    pub decision: TransferDecision,
    #[garde(skip)]
    pub status_note: Option<String>,
}

fn positive_amount(value: &f64, _ctx: &()) -> garde::Result {
    if *value > 0.0 {
        Ok(())
    } else {
        Err(garde::Error::new("amount must be positive"))
    }
}

fn required_date(value: &Option<DateTime<Utc>>, _ctx: &()) -> garde::Result {
    if value.is_some() {
        Ok(())
    } else {
        Err(garde::Error::new("transfer date is required"))
    }
}

/// Reconciliation engine for manually attested bank transfers.
///
/// Residents submit a `Pending` record carrying a generated reference
/// code; an admin later verifies or rejects it exactly once. Verification
/// cascades into the linked due inside the repository's atomic unit. The
/// engine notifies no one itself; callers raise notifications through the
/// orchestrator.
pub struct BankTransferService {
    transfer_repository: Arc<dyn BankTransferRepository>,
    bank_account_repository: Arc<dyn BankAccountRepository>,
    reference_codes: Arc<dyn ReferenceCodeProvider>,
    receipt_store: Arc<dyn ReceiptStore>,
}

impl BankTransferService {
    pub fn new(
        transfer_repository: Arc<dyn BankTransferRepository>,
        bank_account_repository: Arc<dyn BankAccountRepository>,
        reference_codes: Arc<dyn ReferenceCodeProvider>,
        receipt_store: Arc<dyn ReceiptStore>,
    ) -> Self {
        Self {
            transfer_repository,
            bank_account_repository,
            reference_codes,
            receipt_store,
        }
    }

    /// Generate a reference code for a submission form
    pub fn generate_reference_code(&self, user_id: &str, due_id: Option<&str>) -> String {
        self.reference_codes.generate(user_id, due_id)
    }

    /// Record a resident's transfer attestation as `Pending`.
    ///
    /// Two identical submissions intentionally produce two distinct
    /// pending transfers; idempotent re-submission is not guaranteed.
    #[instrument(skip(self, request), fields(user_id = %request.ctx.user_id, bank_account_id = %request.bank_account_id))]
    pub async fn submit_transfer(
        &self,
        request: SubmitTransferRequest,
    ) -> DomainResult<BankTransfer> {
        common::garde::validate_struct(&request)?;

        let account = self
            .bank_account_repository
            .get_bank_account(GetBankAccountRepoInput {
                bank_account_id: request.bank_account_id.clone(),
            })
            .await?;
        match account {
            Some(account) if account.is_active => {}
            _ => {
                return Err(DomainError::ValidationError(format!(
                    "Bank account {} does not resolve to an active account",
                    request.bank_account_id
                )))
            }
        }

        let transfer_id = xid::new().to_string();
        let reference_code = self
            .reference_codes
            .generate(&request.ctx.user_id, request.due_id.as_deref());

        // Upload the receipt before persisting anything; an upload failure
        // aborts the submission and the resident retries.
        let receipt_ref = match request.receipt {
            Some(content) => {
                let key = format!("receipts/{}/{}", request.ctx.user_id, transfer_id);
                Some(self.receipt_store.upload_receipt(&key, content).await?)
            }
            None => None,
        };

        let transfer = self
            .transfer_repository
            .create_transfer(CreateBankTransferRepoInput {
                id: transfer_id,
                user_id: request.ctx.user_id.clone(),
                bank_account_id: request.bank_account_id,
                amount: request.amount,
                transfer_date: request.transfer_date.unwrap_or_else(Utc::now),
                reference_code,
                sender_name: request.sender_name,
                description: request.description,
                receipt_ref,
                due_id: request.due_id,
            })
            .await?;

        info!(
            transfer_id = %transfer.id,
            reference_code = %transfer.reference_code,
            "Bank transfer submitted"
        );
        Ok(transfer)
    }

    /// Pending transfers for the admin's own building, newest first
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn list_pending_for_apartment(
        &self,
        ctx: &UserContext,
    ) -> DomainResult<Vec<BankTransfer>> {
        ctx.require_admin()?;
        let apartment_id = ctx.require_apartment()?;

        let transfers = self
            .transfer_repository
            .list_pending_for_apartment(ListPendingForApartmentRepoInput {
                apartment_id: apartment_id.to_string(),
            })
            .await?;

        debug!(count = transfers.len(), "Listed pending transfers");
        Ok(transfers)
    }

    /// The caller's own submission history, newest first
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn list_my_transfers(&self, ctx: &UserContext) -> DomainResult<Vec<BankTransfer>> {
        self.transfer_repository
            .list_transfers_by_user(ListTransfersByUserRepoInput {
                user_id: ctx.user_id.clone(),
            })
            .await
    }

    /// Active destination accounts the caller may submit against
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn list_selectable_accounts(
        &self,
        ctx: &UserContext,
    ) -> DomainResult<Vec<BankAccount>> {
        let apartment_id = ctx.require_apartment()?;

        self.bank_account_repository
            .list_active_for_apartment(ListActiveBankAccountsRepoInput {
                apartment_id: apartment_id.to_string(),
            })
            .await
    }

    /// Apply an admin's terminal decision to a pending transfer.
    ///
    /// The status check and transition, plus the due cascade on
    /// `Verified`, run as one atomic unit at the repository layer; a
    /// concurrent decision on the same transfer yields exactly one
    /// success and an `InvalidTransferState` for the loser.
    #[instrument(skip(self, request), fields(admin_id = %request.ctx.user_id, transfer_id = %request.transfer_id, decision = ?request.decision))]
    pub async fn decide_transfer(
        &self,
        request: DecideTransferRequest,
    ) -> DomainResult<BankTransfer> {
        common::garde::validate_struct(&request)?;
        request.ctx.require_admin()?;

        let existing = self
            .transfer_repository
            .get_transfer(GetBankTransferRepoInput {
                transfer_id: request.transfer_id.clone(),
            })
            .await?
            .ok_or_else(|| DomainError::TransferNotFound(request.transfer_id.clone()))?;

        // A building admin only ever acts on transfers aimed at their own
        // building's accounts; anything else reads as not found.
        if request.ctx.role != Role::SuperAdmin {
            let apartment_id = request.ctx.require_apartment()?;
            let account = self
                .bank_account_repository
                .get_bank_account(GetBankAccountRepoInput {
                    bank_account_id: existing.bank_account_id.clone(),
                })
                .await?;
            let owned = account
                .map(|account| account.apartment_id == apartment_id)
                .unwrap_or(false);
            if !owned {
                return Err(DomainError::TransferNotFound(request.transfer_id.clone()));
            }
        }

        if existing.status != TransferStatus::Pending {
            return Err(DomainError::InvalidTransferState(format!(
                "Transfer {} has already been decided",
                request.transfer_id
            )));
        }

        let decided = self
            .transfer_repository
            .decide_transfer(DecideTransferRepoInput {
                transfer_id: request.transfer_id.clone(),
                decision: request.decision,
                decided_by_user_id: request.ctx.user_id.clone(),
                status_note: request.status_note,
                decided_at: Utc::now(),
            })
            .await?
            .ok_or_else(|| {
                // Lost the race against another decision
                DomainError::InvalidTransferState(format!(
                    "Transfer {} has already been decided",
                    request.transfer_id
                ))
            })?;

        info!(
            transfer_id = %decided.id,
            status = ?decided.status,
            "Bank transfer decided"
        );
        Ok(decided)
    }
}
