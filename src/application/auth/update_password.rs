use std::sync::Arc;

use crate::domain::auth::account::AccountService;
use crate::domain::auth::errors::AuthError;

/// Command carrying a reset token and the new password
#[derive(Clone)]
pub struct UpdatePasswordCommand {
  pub email: String,
  pub password: String,
  pub token: String,
}

impl std::fmt::Debug for UpdatePasswordCommand {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UpdatePasswordCommand")
      .field("email", &self.email)
      .field("password", &"***")
      .field("token", &"***")
      .finish()
  }
}

/// Use case for setting a new password with a reset token
pub struct UpdatePasswordUseCase {
  account_service: Arc<AccountService>,
}

impl UpdatePasswordUseCase {
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// On success every refresh session of the account is revoked
  pub async fn execute(&self, command: UpdatePasswordCommand) -> Result<(), AuthError> {
    self
      .account_service
      .update_password(&command.email, &command.password, &command.token)
      .await
  }
}
