use chrono::Duration;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::entities::User;
use super::errors::AuthError;
use super::locks::UserLocks;
use super::ports::{Mailer, PasswordHasher, TokenGenerator, UserRepository};
use super::value_objects::{Email, Password, Role};
use crate::domain::clock::Clock;
use crate::domain::errors::RepositoryError;

/// Default validity of activation and password reset tokens
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

/// Registration input as received from the boundary
#[derive(Debug, Clone, Default)]
pub struct Registration {
  pub username: String,
  pub email: String,
  pub password: String,
  pub name: Option<String>,
  pub bio: Option<String>,
}

/// Account lifecycle: registration, activation and password reset
///
/// Activation and reset tokens are random, single-use and time-boxed. Each
/// has its own issue timestamp on the user record and its own validity.
pub struct AccountService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_generator: Arc<dyn TokenGenerator>,
  mailer: Arc<dyn Mailer>,
  clock: Arc<dyn Clock>,
  user_locks: Arc<UserLocks>,
  activation_validity: Duration,
  reset_validity: Duration,
}

impl AccountService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_generator: Arc<dyn TokenGenerator>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    user_locks: Arc<UserLocks>,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_generator,
      mailer,
      clock,
      user_locks,
      activation_validity: Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS),
      reset_validity: Duration::hours(DEFAULT_TOKEN_VALIDITY_HOURS),
    }
  }

  pub fn with_token_validity(mut self, activation: Duration, reset: Duration) -> Self {
    self.activation_validity = activation;
    self.reset_validity = reset;
    self
  }

  /// Registers an inactive `user` account and emails its activation token
  ///
  /// All validation and both uniqueness checks run before the password is
  /// hashed. If the email cannot be sent the account stays stored and the
  /// caller still receives `FailedToSendEmail`.
  pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
    let username = registration.username.trim().to_string();
    if username.is_empty()
      || registration.email.trim().is_empty()
      || registration.password.is_empty()
    {
      return Err(AuthError::MissingRequiredFields);
    }

    let email = Email::new(registration.email).map_err(|_| AuthError::InvalidEmail)?;
    let password = Password::new(registration.password).map_err(AuthError::InvalidPassword)?;

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyUsed);
    }
    if self.user_repo.find_by_username(&username).await?.is_some() {
      return Err(AuthError::UsernameAlreadyUsed);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let activation_token = self.token_generator.generate().await?;
    let now = self.clock.now();

    let mut user = User::new(username, email.as_str().to_string(), password_hash.into_inner(), now);
    user.name = registration.name.filter(|n| !n.trim().is_empty());
    user.bio = registration.bio.filter(|b| !b.trim().is_empty());
    user.set_activation_token(activation_token.clone(), now);

    let created = match self.user_repo.create(user).await {
      Ok(user) => user,
      // Lost a race against a concurrent registration
      Err(RepositoryError::DuplicateKey(field)) if field.contains("email") => {
        return Err(AuthError::EmailAlreadyUsed);
      }
      Err(RepositoryError::DuplicateKey(_)) => return Err(AuthError::UsernameAlreadyUsed),
      Err(e) => return Err(e.into()),
    };

    if let Err(e) = self.mailer.send_activation(&email, &activation_token).await {
      error!(user_id = %created.id, error = %e, "Activation email failed after registration");
      return Err(AuthError::FailedToSendEmail(e));
    }

    info!(user_id = %created.id, "User registered");
    Ok(created)
  }

  /// Creates an active admin account unless the email is already registered
  ///
  /// Returns whether an account was created. Used at start-up so that the
  /// admin-only routes are reachable on a fresh store.
  pub async fn ensure_admin(
    &self,
    username: &str,
    email: &str,
    password: &str,
  ) -> Result<bool, AuthError> {
    let username = username.trim();
    if username.is_empty() || email.trim().is_empty() || password.is_empty() {
      return Err(AuthError::MissingRequiredFields);
    }

    let email = Email::new(email).map_err(|_| AuthError::InvalidEmail)?;
    let password = Password::new(password).map_err(AuthError::InvalidPassword)?;

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Ok(false);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let now = self.clock.now();

    let mut admin = User::new(
      username.to_string(),
      email.into_inner(),
      password_hash.into_inner(),
      now,
    );
    admin.role = Role::Admin;
    admin.activate(now);

    let created = match self.user_repo.create(admin).await {
      Ok(user) => user,
      Err(RepositoryError::DuplicateKey(field)) if field.contains("email") => return Ok(false),
      Err(RepositoryError::DuplicateKey(_)) => return Err(AuthError::UsernameAlreadyUsed),
      Err(e) => return Err(e.into()),
    };

    info!(user_id = %created.id, "Admin account created");
    Ok(true)
  }

  /// Redeems an activation token
  ///
  /// An unknown email or a token that does not match yields `InvalidToken`;
  /// a matching token older than the validity window yields `ExpiredToken`.
  pub async fn activate_account(&self, token: &str, email: &str) -> Result<(), AuthError> {
    let email = Email::new(email).map_err(|_| AuthError::InvalidEmail)?;
    if token.is_empty() {
      return Err(AuthError::InvalidToken);
    }

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidToken)?;

    if user.activation_token.as_deref() != Some(token) {
      warn!(user_id = %user.id, "Activation rejected: token mismatch");
      return Err(AuthError::InvalidToken);
    }

    let now = self.clock.now();
    if user.is_activation_token_expired(now, self.activation_validity) {
      warn!(user_id = %user.id, "Activation rejected: token expired");
      return Err(AuthError::ExpiredToken);
    }

    let _guard = self.user_locks.acquire(user.id).await;

    if !self.user_repo.activate(user.id, token, now).await? {
      // Redeemed concurrently
      return Err(AuthError::InvalidToken);
    }

    info!(user_id = %user.id, "Account activated");
    Ok(())
  }

  /// Issues and emails a fresh activation token; no-op for active accounts
  pub async fn request_new_verification_email(&self, email: &str) -> Result<(), AuthError> {
    let email = Email::new(email).map_err(|_| AuthError::InvalidEmail)?;

    let existing = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::NotFound)?;

    if existing.is_active {
      return Ok(());
    }

    let token = self.token_generator.generate().await?;

    {
      let _guard = self.user_locks.acquire(existing.id).await;
      let mut user = self
        .user_repo
        .find_by_id(existing.id)
        .await?
        .ok_or(AuthError::NotFound)?;
      if user.is_active {
        return Ok(());
      }

      user.set_activation_token(token.clone(), self.clock.now());
      self
        .user_repo
        .update(user)
        .await
        .map_err(AuthError::FailedToUpdateUser)?;
    }

    self.mailer.send_activation(&email, &token).await?;

    info!(user_id = %existing.id, "Verification email re-sent");
    Ok(())
  }

  /// Issues a password reset token and emails it
  pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
    let email = Email::new(email).map_err(|_| AuthError::InvalidEmail)?;

    let existing = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::NotFound)?;

    let token = self.token_generator.generate().await?;

    {
      let _guard = self.user_locks.acquire(existing.id).await;
      let mut user = self
        .user_repo
        .find_by_id(existing.id)
        .await?
        .ok_or(AuthError::NotFound)?;

      user.set_password_reset_token(token.clone(), self.clock.now());
      self
        .user_repo
        .update(user)
        .await
        .map_err(AuthError::FailedToUpdateUser)?;
    }

    self.mailer.send_password_reset(&email, &token).await?;

    info!(user_id = %existing.id, "Password reset requested");
    Ok(())
  }

  /// Sets a new password using a reset token
  ///
  /// The token must match and be within the validity window. On success the
  /// token is consumed and every refresh session of the account is revoked.
  pub async fn update_password(
    &self,
    email: &str,
    password: &str,
    token: &str,
  ) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() || token.is_empty() {
      return Err(AuthError::MissingRequiredFields);
    }

    let email = Email::new(email).map_err(|_| AuthError::InvalidEmail)?;
    let password = Password::new(password).map_err(AuthError::InvalidPassword)?;

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidToken)?;

    let new_hash = self.password_hasher.hash(&password).await?;
    let now = self.clock.now();

    let _guard = self.user_locks.acquire(user.id).await;

    let updated = self
      .user_repo
      .reset_password(&email, token, now - self.reset_validity, &new_hash, now)
      .await?;

    if !updated {
      warn!(user_id = %user.id, "Password update rejected: invalid or expired reset token");
      return Err(AuthError::InvalidToken);
    }

    info!(user_id = %user.id, "Password updated, sessions revoked");
    Ok(())
  }
}
