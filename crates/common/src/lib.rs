pub mod auth;
pub mod blob;
pub mod domain;
pub mod email;
pub mod garde;
pub mod telemetry;

// Re-export mocks when the testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use blob::MockReceiptStore;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockBankAccountRepository;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockBankTransferRepository;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockDueRepository;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockNotificationRepository;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockUserDirectory;
#[cfg(any(test, feature = "testing"))]
pub use email::MockEmailSender;
