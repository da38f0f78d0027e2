use std::sync::Arc;

use crate::domain::auth::account::AccountService;
use crate::domain::auth::errors::AuthError;

#[derive(Debug, Clone)]
pub struct ResendVerificationEmailCommand {
  pub email: String,
}

/// Use case for re-sending the activation email
///
/// Succeeds without sending anything when the account is already active.
pub struct ResendVerificationEmailUseCase {
  account_service: Arc<AccountService>,
}

impl ResendVerificationEmailUseCase {
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  pub async fn execute(&self, command: ResendVerificationEmailCommand) -> Result<(), AuthError> {
    self
      .account_service
      .request_new_verification_email(&command.email)
      .await
  }
}
