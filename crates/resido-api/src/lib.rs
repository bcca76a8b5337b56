pub mod config;
pub mod domain;
pub mod memory;

pub use config::ServiceConfig;
pub use domain::{
    BankTransferService, DecideTransferRequest, ListNotificationsRequest,
    NotificationOrchestrator, NotificationPage, NotificationService, NotifyRequest,
    RandomReferenceCodeProvider, RecipientSelection, ReferenceCodeProvider,
    SubmitTransferRequest,
};
