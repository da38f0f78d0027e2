use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{TokenClaims, TokenKind, User};
use super::errors::{AuthError, HashError, MailError, TokenError};
use super::value_objects::{Email, Password, PasswordHash, UserId};
use crate::domain::errors::RepositoryError;

/// Repository trait for user persistence operations
///
/// Refresh sessions and one-time tokens live on the user record, so `update`
/// persists them together with the rest of the account.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user; fails with `DuplicateKey` if email or username is taken
  async fn create(&self, user: User) -> Result<User, RepositoryError>;

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

  /// Replaces a stored user; fails with `NotFound` if it does not exist
  async fn update(&self, user: User) -> Result<User, RepositoryError>;

  async fn list(&self) -> Result<Vec<User>, RepositoryError>;

  /// Removes a user and returns the removed record
  async fn delete(&self, id: UserId) -> Result<User, RepositoryError>;

  /// Activates the account only if `token` is still its outstanding activation
  /// token; clears the token in the same step
  ///
  /// Returns `false` when nothing matched.
  async fn activate(
    &self,
    id: UserId,
    token: &str,
    now: DateTime<Utc>,
  ) -> Result<bool, RepositoryError>;

  /// Stores `new_hash` only if `(email, token)` matches a reset token issued
  /// after `issued_after`; clears the token and every refresh session
  ///
  /// Returns `false` when nothing matched.
  async fn reset_password(
    &self,
    email: &Email,
    token: &str,
    issued_after: DateTime<Utc>,
    new_hash: &PasswordHash,
    now: DateTime<Utc>,
  ) -> Result<bool, RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, HashError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, HashError>;
}

/// Service trait for opaque activation and reset tokens
#[async_trait]
pub trait TokenGenerator: Send + Sync {
  /// Generates a cryptographically secure random token
  async fn generate(&self) -> Result<String, AuthError>;
}

/// Issues and verifies signed bearer tokens
///
/// Pure computation over the user, a secret and the clock; safe to share
/// across tasks without locking.
pub trait TokenService: Send + Sync {
  fn issue_access_token(&self, user: &User) -> Result<String, TokenError>;

  fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError>;

  fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError>;
}

/// Outbound email capability; failures are surfaced, never retried
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send_activation(&self, to: &Email, token: &str) -> Result<(), MailError>;

  async fn send_password_reset(&self, to: &Email, token: &str) -> Result<(), MailError>;
}
