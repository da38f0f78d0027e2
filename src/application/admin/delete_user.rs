use std::sync::Arc;
use tracing::info;

use crate::application::auth::UserProfile;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::locks::UserLocks;
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::errors::RepositoryError;

#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
  pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteUserResponse {
  pub user: UserProfile,
}

/// Use case for admins removing an account together with its sessions
pub struct DeleteUserUseCase {
  user_repo: Arc<dyn UserRepository>,
  user_locks: Arc<UserLocks>,
}

impl DeleteUserUseCase {
  pub fn new(user_repo: Arc<dyn UserRepository>, user_locks: Arc<UserLocks>) -> Self {
    Self {
      user_repo,
      user_locks,
    }
  }

  pub async fn execute(
    &self,
    actor: &Actor,
    command: DeleteUserCommand,
  ) -> Result<DeleteUserResponse, AuthError> {
    if !actor.is_admin() {
      return Err(AuthError::Forbidden);
    }
    let user_id = UserId::parse(&command.user_id).map_err(|_| AuthError::InvalidUserId)?;

    let deleted = {
      let _guard = self.user_locks.acquire(user_id).await;
      match self.user_repo.delete(user_id).await {
        Ok(user) => user,
        Err(RepositoryError::NotFound) => return Err(AuthError::NotFound),
        Err(e) => return Err(e.into()),
      }
    };
    self.user_locks.forget(user_id);

    info!(user_id = %user_id, admin_id = %actor.user_id, "User deleted");
    Ok(DeleteUserResponse {
      user: deleted.into(),
    })
  }
}
