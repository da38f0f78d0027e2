use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Actor, DeviceFingerprint, UserId};

/// Command for ending sessions of the calling user
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoutUserCommand {
  /// End the sessions of every device instead of only the calling one
  pub all_devices: bool,
}

#[derive(Debug, Clone)]
pub struct LogoutUserResponse {
  pub revoked_sessions: usize,
}

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Revokes the refresh session of `device`, or of every device
  ///
  /// Logging out a device without a session succeeds with zero revoked.
  pub async fn execute(
    &self,
    actor: &Actor,
    device: &DeviceFingerprint,
    command: LogoutUserCommand,
  ) -> Result<LogoutUserResponse, AuthError> {
    let user_id = UserId::parse(&actor.user_id).map_err(|_| AuthError::InvalidUserId)?;

    let revoked_sessions = if command.all_devices {
      self.auth_service.logout_all(user_id).await?
    } else {
      usize::from(self.auth_service.logout(user_id, device).await?)
    };

    Ok(LogoutUserResponse { revoked_sessions })
  }
}
