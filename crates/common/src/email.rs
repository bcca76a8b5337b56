mod sender;

pub use sender::{EmailMessage, EmailSender, SendEmailOutput};

#[cfg(any(test, feature = "testing"))]
pub use sender::MockEmailSender;
