mod ledger;
mod notification_repository;
mod user_directory;

pub use ledger::InMemoryLedger;
pub use notification_repository::InMemoryNotificationRepository;
pub use user_directory::InMemoryUserDirectory;
