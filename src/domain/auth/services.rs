use std::sync::Arc;
use tracing::{info, warn};

use super::entities::{RefreshTokenSession, TokenKind, TokenPair, User};
use super::errors::AuthError;
use super::locks::UserLocks;
use super::ports::{PasswordHasher, TokenService, UserRepository};
use super::value_objects::{Actor, DeviceFingerprint, Email, Password, PasswordHash, TokenHash, UserId};
use crate::domain::clock::Clock;

/// Session manager: login, refresh-token rotation and logout
///
/// Every read-modify-write of a user's session list runs while holding that
/// user's lock. Two concurrent refreshes from one device therefore cannot
/// both succeed.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_service: Arc<dyn TokenService>,
  clock: Arc<dyn Clock>,
  user_locks: Arc<UserLocks>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    user_locks: Arc<UserLocks>,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_service,
      clock,
      user_locks,
    }
  }

  /// Authenticates a user and opens (or replaces) the session for `device`
  ///
  /// Unknown email and wrong password both yield `InvalidCredentials`. The
  /// activation check runs after the password check so an inactive account
  /// is only revealed to someone holding its password.
  pub async fn login(
    &self,
    email: &str,
    password: &str,
    device: DeviceFingerprint,
  ) -> Result<TokenPair, AuthError> {
    let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
    let password = Password::for_verification(password).map_err(|_| AuthError::InvalidCredentials)?;

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let stored_hash = PasswordHash::from_hash(&user.password_hash)
      .map_err(|e| AuthError::Internal(format!("stored password hash: {}", e)))?;

    if !self.password_hasher.verify(&password, &stored_hash).await? {
      warn!(user_id = %user.id, "Login rejected: wrong password");
      return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
      warn!(user_id = %user.id, "Login rejected: account not activated");
      return Err(AuthError::AccountNotActivated);
    }

    let _guard = self.user_locks.acquire(user.id).await;

    // Re-read under the lock so the session list is current
    let mut user = self
      .user_repo
      .find_by_id(user.id)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let tokens = self.rotate_session(&mut user, device.clone()).await?;

    info!(user_id = %user.id, device = %device, "User logged in");
    Ok(tokens)
  }

  /// Exchanges a refresh token for a new token pair
  ///
  /// The presented token must verify as a refresh token for `user_id` and
  /// match the session stored for `device`. The matched session is consumed,
  /// so replaying the same token fails with `InvalidToken`.
  pub async fn refresh(
    &self,
    user_id: &str,
    device: DeviceFingerprint,
    presented_token: &str,
  ) -> Result<TokenPair, AuthError> {
    let user_id = UserId::parse(user_id).map_err(|_| AuthError::InvalidUserId)?;

    let claims = self
      .token_service
      .verify(presented_token, TokenKind::Refresh)?;
    if claims.sub != user_id.to_string() {
      warn!(user_id = %user_id, "Refresh rejected: token issued to another user");
      return Err(AuthError::InvalidToken);
    }

    let _guard = self.user_locks.acquire(user_id).await;

    let mut user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::NotFound)?;

    if user
      .take_session(&device, &TokenHash::of(presented_token))
      .is_none()
    {
      warn!(user_id = %user_id, device = %device, "Refresh rejected: no matching session");
      return Err(AuthError::InvalidToken);
    }

    let tokens = self.rotate_session(&mut user, device.clone()).await?;

    info!(user_id = %user_id, device = %device, "Refresh token rotated");
    Ok(tokens)
  }

  /// Ends the session of one device; returns whether a session existed
  pub async fn logout(&self, user_id: UserId, device: &DeviceFingerprint) -> Result<bool, AuthError> {
    let _guard = self.user_locks.acquire(user_id).await;

    let mut user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::NotFound)?;

    if !user.remove_session(device, self.clock.now()) {
      return Ok(false);
    }

    self
      .user_repo
      .update(user)
      .await
      .map_err(AuthError::FailedToUpdateUser)?;

    info!(user_id = %user_id, device = %device, "User logged out");
    Ok(true)
  }

  /// Ends every session of a user; returns how many were revoked
  pub async fn logout_all(&self, user_id: UserId) -> Result<usize, AuthError> {
    let _guard = self.user_locks.acquire(user_id).await;

    let mut user = self
      .user_repo
      .find_by_id(user_id)
      .await?
      .ok_or(AuthError::NotFound)?;

    let revoked = user.clear_sessions(self.clock.now());
    self
      .user_repo
      .update(user)
      .await
      .map_err(AuthError::FailedToUpdateUser)?;

    info!(user_id = %user_id, revoked, "User logged out from all devices");
    Ok(revoked)
  }

  /// Verifies an access token and returns the identity it carries
  pub fn authenticate(&self, access_token: &str) -> Result<Actor, AuthError> {
    let claims = self.token_service.verify(access_token, TokenKind::Access)?;
    let role = claims.role.ok_or(AuthError::InvalidToken)?;
    Ok(Actor::new(claims.sub, role))
  }

  /// Issues a fresh pair, installs the refresh session and persists the user
  async fn rotate_session(
    &self,
    user: &mut User,
    device: DeviceFingerprint,
  ) -> Result<TokenPair, AuthError> {
    let refresh_token = self.token_service.issue_refresh_token(user)?;
    user.replace_session(RefreshTokenSession::new(
      &refresh_token,
      device,
      self.clock.now(),
    ));

    let updated = self
      .user_repo
      .update(user.clone())
      .await
      .map_err(AuthError::FailedToUpdateUser)?;

    let access_token = self.token_service.issue_access_token(&updated)?;

    Ok(TokenPair {
      access_token,
      refresh_token,
    })
  }
}
