mod log_mailer;
mod outbox_mailer;

pub use log_mailer::LogMailer;
pub use outbox_mailer::{OutboxMailer, SentMail, SentMailKind};
