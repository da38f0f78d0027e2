use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::domain::auth::errors::MailError;
use crate::domain::auth::ports::Mailer;
use crate::domain::auth::value_objects::Email;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentMailKind {
  Activation,
  PasswordReset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
  pub kind: SentMailKind,
  pub to: String,
  pub token: String,
}

/// Mailer that keeps every dispatched message in memory
///
/// Delivery can be switched to fail to exercise the email-failure paths.
#[derive(Debug, Default)]
pub struct OutboxMailer {
  sent: Mutex<Vec<SentMail>>,
  failing: AtomicBool,
}

impl OutboxMailer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub async fn sent(&self) -> Vec<SentMail> {
    self.sent.lock().await.clone()
  }

  /// Token of the most recent message of `kind` sent to `to`
  pub async fn last_token(&self, kind: SentMailKind, to: &str) -> Option<String> {
    self
      .sent
      .lock()
      .await
      .iter()
      .rev()
      .find(|m| m.kind == kind && m.to == to)
      .map(|m| m.token.clone())
  }

  async fn record(&self, kind: SentMailKind, to: &Email, token: &str) -> Result<(), MailError> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(MailError::DeliveryFailed("outbox rejected message".to_string()));
    }
    self.sent.lock().await.push(SentMail {
      kind,
      to: to.as_str().to_string(),
      token: token.to_string(),
    });
    Ok(())
  }
}

#[async_trait]
impl Mailer for OutboxMailer {
  async fn send_activation(&self, to: &Email, token: &str) -> Result<(), MailError> {
    self.record(SentMailKind::Activation, to, token).await
  }

  async fn send_password_reset(&self, to: &Email, token: &str) -> Result<(), MailError> {
    self.record(SentMailKind::PasswordReset, to, token).await
  }
}
