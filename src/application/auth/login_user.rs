use std::sync::Arc;

use crate::domain::auth::entities::TokenPair;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::DeviceFingerprint;

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub tokens: TokenPair,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Arguments
  /// * `command` - The login command containing credentials
  /// * `device` - Fingerprint of the calling device; its previous session is replaced
  ///
  /// # Errors
  /// Returns `AuthError::InvalidCredentials` for an unknown email or wrong
  /// password and `AuthError::AccountNotActivated` for inactive accounts
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    device: DeviceFingerprint,
  ) -> Result<LoginUserResponse, AuthError> {
    let tokens = self
      .auth_service
      .login(&command.email, &command.password, device)
      .await?;

    Ok(LoginUserResponse { tokens })
  }
}
