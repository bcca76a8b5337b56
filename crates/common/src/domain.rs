mod bank_account;
mod bank_transfer;
mod due;
mod notification;
mod result;
mod user;

pub use bank_account::*;
pub use bank_transfer::*;
pub use due::*;
pub use notification::*;
pub use result::{DomainError, DomainResult};
pub use user::*;
