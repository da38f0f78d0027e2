use std::sync::Arc;

use crate::application::auth::UserProfile;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::Actor;

#[derive(Debug, Clone)]
pub struct ListUsersResponse {
  pub users: Vec<UserProfile>,
}

/// Use case for admins listing every account
pub struct ListUsersUseCase {
  user_repo: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  pub async fn execute(&self, actor: &Actor) -> Result<ListUsersResponse, AuthError> {
    if !actor.is_admin() {
      return Err(AuthError::Forbidden);
    }

    let users = self
      .user_repo
      .list()
      .await?
      .into_iter()
      .map(UserProfile::from)
      .collect();

    Ok(ListUsersResponse { users })
  }
}
