use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::auth::errors::MailError;
use crate::domain::auth::ports::Mailer;
use crate::domain::auth::value_objects::Email;

/// Development mailer: renders the links and writes them to the log
///
/// Tokens are credentials, so only the recipient and the link path are
/// logged at `info`; the full link is emitted at `debug`.
#[derive(Debug, Clone)]
pub struct LogMailer {
  base_url: String,
}

impl LogMailer {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  fn activation_link(&self, to: &Email, token: &str) -> String {
    format!("{}/users/verify-email/{}/{}", self.base_url, token, to)
  }

  fn reset_link(&self, to: &Email, token: &str) -> String {
    format!(
      "{}/users/password-update?token={}&email={}",
      self.base_url, token, to
    )
  }
}

#[async_trait]
impl Mailer for LogMailer {
  async fn send_activation(&self, to: &Email, token: &str) -> Result<(), MailError> {
    let link = self.activation_link(to, token);
    info!(to = %to, path = "/users/verify-email", "Activation email dispatched");
    debug!(link = %link, "Activation link");
    Ok(())
  }

  async fn send_password_reset(&self, to: &Email, token: &str) -> Result<(), MailError> {
    let link = self.reset_link(to, token);
    info!(to = %to, path = "/users/password-update", "Password reset email dispatched");
    debug!(link = %link, "Password reset link");
    Ok(())
  }
}
