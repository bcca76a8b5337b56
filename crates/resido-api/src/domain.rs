mod bank_transfer_service;
mod notification_orchestrator;
mod notification_service;
mod reference_code;
pub mod templates;

pub use bank_transfer_service::{
    BankTransferService, DecideTransferRequest, SubmitTransferRequest,
};
pub use notification_orchestrator::{
    NotificationOrchestrator, NotifyRequest, RecipientSelection,
};
pub use notification_service::{
    ListNotificationsRequest, NotificationPage, NotificationService,
};
pub use reference_code::{RandomReferenceCodeProvider, ReferenceCodeProvider};

#[cfg(any(test, feature = "testing"))]
pub use reference_code::MockReferenceCodeProvider;
