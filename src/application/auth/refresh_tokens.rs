use std::sync::Arc;

use crate::domain::auth::entities::TokenPair;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::DeviceFingerprint;

#[derive(Debug, Clone)]
pub struct RefreshTokensCommand {
  pub user_id: String,
  pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RefreshTokensResponse {
  pub tokens: TokenPair,
}

/// Use case for rotating a refresh token into a new token pair
pub struct RefreshTokensUseCase {
  auth_service: Arc<AuthService>,
}

impl RefreshTokensUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// The presented refresh token is single-use; a replay fails with
  /// `AuthError::InvalidToken`
  pub async fn execute(
    &self,
    command: RefreshTokensCommand,
    device: DeviceFingerprint,
  ) -> Result<RefreshTokensResponse, AuthError> {
    let tokens = self
      .auth_service
      .refresh(&command.user_id, device, &command.refresh_token)
      .await?;

    Ok(RefreshTokensResponse { tokens })
  }
}
