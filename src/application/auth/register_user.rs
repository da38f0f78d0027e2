use std::sync::Arc;

use crate::domain::auth::account::{AccountService, Registration};
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::value_objects::UserId;

/// Command for registering a new user
#[derive(Debug, Clone, Default)]
pub struct RegisterUserCommand {
  pub username: String,
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
  pub name: Option<String>,
  pub bio: Option<String>,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  /// Unique identifier of the newly created user
  pub user_id: UserId,
  pub username: String,
  pub email: String,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  account_service: Arc<AccountService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(account_service: Arc<AccountService>) -> Self {
    Self { account_service }
  }

  /// Executes the user registration use case
  ///
  /// The account is created inactive and an activation email is sent.
  ///
  /// # Errors
  /// Returns `AuthError` if validation fails, the email or username is
  /// taken, or the activation email could not be sent (the account is kept)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let user = self
      .account_service
      .register(Registration {
        username: command.username,
        email: command.email,
        password: command.password,
        name: command.name,
        bio: command.bio,
      })
      .await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      username: user.username,
      email: user.email,
    })
  }
}
