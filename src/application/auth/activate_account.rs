use std::sync::Arc;

use crate::domain::auth::account::AccountService;
use crate::domain::auth::errors::AuthError;

#[derive(Debug, Clone)]
pub struct ActivateAccountCommand {
  pub token: String,
  pub email: String,
}

/// Use case for redeeming an activation token
pub struct ActivateAccountUseCase {
  account_service: Arc<AccountService>,
}

impl ActivateAccountUseCase {
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  pub async fn execute(&self, command: ActivateAccountCommand) -> Result<(), AuthError> {
    self
      .account_service
      .activate_account(&command.token, &command.email)
      .await
  }
}
