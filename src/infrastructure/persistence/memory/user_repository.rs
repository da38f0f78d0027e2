use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::User,
  ports::UserRepository,
  value_objects::{Email, PasswordHash, UserId},
};
use crate::domain::errors::RepositoryError;

/// In-memory implementation of the UserRepository trait
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, RepositoryError> {
    let mut users = self.users.write().await;

    if users.values().any(|u| u.email == user.email) {
      return Err(RepositoryError::DuplicateKey("email".to_string()));
    }
    if users.values().any(|u| u.username == user.username) {
      return Err(RepositoryError::DuplicateKey("username".to_string()));
    }
    if users.contains_key(&user.id) {
      return Err(RepositoryError::DuplicateKey("id".to_string()));
    }

    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
    Ok(self.users.read().await.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
    let users = self.users.read().await;
    Ok(users.values().find(|u| u.email == email.as_str()).cloned())
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
    let users = self.users.read().await;
    Ok(users.values().find(|u| u.username == username).cloned())
  }

  async fn update(&self, user: User) -> Result<User, RepositoryError> {
    let mut users = self.users.write().await;

    let stored = users.get_mut(&user.id).ok_or(RepositoryError::NotFound)?;
    *stored = user.clone();
    Ok(user)
  }

  async fn list(&self) -> Result<Vec<User>, RepositoryError> {
    let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(users)
  }

  async fn delete(&self, id: UserId) -> Result<User, RepositoryError> {
    self
      .users
      .write()
      .await
      .remove(&id)
      .ok_or(RepositoryError::NotFound)
  }

  async fn activate(
    &self,
    id: UserId,
    token: &str,
    now: DateTime<Utc>,
  ) -> Result<bool, RepositoryError> {
    let mut users = self.users.write().await;

    match users.get_mut(&id) {
      Some(user) if user.activation_token.as_deref() == Some(token) => {
        user.activate(now);
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn reset_password(
    &self,
    email: &Email,
    token: &str,
    issued_after: DateTime<Utc>,
    new_hash: &PasswordHash,
    now: DateTime<Utc>,
  ) -> Result<bool, RepositoryError> {
    let mut users = self.users.write().await;

    let Some(user) = users.values_mut().find(|u| u.email == email.as_str()) else {
      return Ok(false);
    };

    let matches = user.password_reset_token.as_deref() == Some(token)
      && user
        .password_reset_token_issued_at
        .is_some_and(|issued_at| issued_at >= issued_after);
    if !matches {
      return Ok(false);
    }

    user.reset_password(new_hash.as_str().to_string(), now);
    Ok(true)
  }
}
