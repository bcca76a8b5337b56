use crate::domain::DomainResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Opaque blob store used to hold uploaded transfer receipts. The core
/// only needs the reference string a successful upload yields.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Upload receipt content under the given key; returns the receipt
    /// reference to persist on the transfer
    async fn upload_receipt(&self, key: &str, content: Bytes) -> DomainResult<String>;

    /// Best-effort removal of an uploaded receipt
    async fn delete_receipt(&self, key: &str) -> DomainResult<()>;
}
