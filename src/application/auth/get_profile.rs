use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::UserRepository;
use crate::domain::auth::value_objects::{Actor, Role, UserId};

/// Public view of an account; never carries credentials or tokens
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
  pub id: UserId,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,
  pub role: Role,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      username: user.username,
      email: user.email,
      name: user.name,
      bio: user.bio,
      role: user.role,
      is_active: user.is_active,
      created_at: user.created_at,
    }
  }
}

/// Use case for getting the profile of the authenticated user
pub struct GetProfileUseCase {
  user_repo: Arc<dyn UserRepository>,
}

impl GetProfileUseCase {
  pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
    Self { user_repo }
  }

  /// # Errors
  /// Returns `AuthError::InvalidUserId` for a malformed subject and
  /// `AuthError::NotFound` if the account no longer exists
  pub async fn execute(&self, actor: &Actor) -> Result<UserProfile, AuthError> {
    let user_id = UserId::parse(&actor.user_id).map_err(|_| AuthError::InvalidUserId)?;

    let user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::NotFound)?;

    Ok(user.into())
  }
}
