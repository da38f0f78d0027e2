use std::sync::Arc;

use crate::domain::auth::account::AccountService;
use crate::domain::auth::errors::AuthError;

#[derive(Debug, Clone)]
pub struct RequestPasswordResetCommand {
  pub email: String,
}

/// Use case for emailing a password reset token
pub struct RequestPasswordResetUseCase {
  account_service: Arc<AccountService>,
}

impl RequestPasswordResetUseCase {
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  pub async fn execute(&self, command: RequestPasswordResetCommand) -> Result<(), AuthError> {
    self
      .account_service
      .request_password_reset(&command.email)
      .await
  }
}
