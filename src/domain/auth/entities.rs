use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::{DeviceFingerprint, Role, TokenHash, UserId};

/// User entity representing an account in the system
#[derive(Debug, Clone)]
pub struct User {
  /// Unique identifier for the user
  pub id: UserId,
  /// Unique username
  pub username: String,
  /// User's email address (unique, normalized)
  pub email: String,
  pub name: Option<String>,
  pub bio: Option<String>,
  /// Argon2id PHC string
  pub password_hash: String,
  pub role: Role,
  /// Inactive accounts cannot log in regardless of credentials
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// At most one entry per device fingerprint
  pub refresh_sessions: Vec<RefreshTokenSession>,
  pub activation_token: Option<String>,
  pub activation_token_issued_at: Option<DateTime<Utc>>,
  pub password_reset_token: Option<String>,
  pub password_reset_token_issued_at: Option<DateTime<Utc>>,
}

impl User {
  /// Creates a new, inactive user with the `user` role
  pub fn new(username: String, email: String, password_hash: String, now: DateTime<Utc>) -> Self {
    Self {
      id: UserId::new(),
      username,
      email,
      name: None,
      bio: None,
      password_hash,
      role: Role::User,
      is_active: false,
      created_at: now,
      updated_at: now,
      refresh_sessions: Vec::new(),
      activation_token: None,
      activation_token_issued_at: None,
      password_reset_token: None,
      password_reset_token_issued_at: None,
    }
  }

  /// Sets a fresh activation token, replacing any previous one
  pub fn set_activation_token(&mut self, token: String, now: DateTime<Utc>) {
    self.activation_token = Some(token);
    self.activation_token_issued_at = Some(now);
    self.updated_at = now;
  }

  /// True when no activation token is outstanding or it is older than `validity`
  pub fn is_activation_token_expired(&self, now: DateTime<Utc>, validity: Duration) -> bool {
    match self.activation_token_issued_at {
      Some(issued_at) => now - issued_at > validity,
      None => true,
    }
  }

  /// Marks the account active and consumes the activation token
  pub fn activate(&mut self, now: DateTime<Utc>) {
    self.is_active = true;
    self.activation_token = None;
    self.activation_token_issued_at = None;
    self.updated_at = now;
  }

  pub fn set_password_reset_token(&mut self, token: String, now: DateTime<Utc>) {
    self.password_reset_token = Some(token);
    self.password_reset_token_issued_at = Some(now);
    self.updated_at = now;
  }

  /// Checks a reset token against the stored one and its validity window
  pub fn is_password_reset_token_valid(
    &self,
    token: &str,
    now: DateTime<Utc>,
    validity: Duration,
  ) -> bool {
    match (&self.password_reset_token, self.password_reset_token_issued_at) {
      (Some(stored), Some(issued_at)) => stored == token && now - issued_at <= validity,
      _ => false,
    }
  }

  /// Stores a new password hash, consumes the reset token and revokes every session
  pub fn reset_password(&mut self, new_password_hash: String, now: DateTime<Utc>) {
    self.password_hash = new_password_hash;
    self.password_reset_token = None;
    self.password_reset_token_issued_at = None;
    self.refresh_sessions.clear();
    self.updated_at = now;
  }

  /// Installs a session for its device, replacing the device's previous one
  ///
  /// Linear scan, first match by device is removed, then the new session is
  /// appended. This is the only place sessions are added, which keeps the
  /// one-session-per-device invariant.
  pub fn replace_session(&mut self, session: RefreshTokenSession) {
    if let Some(index) = self
      .refresh_sessions
      .iter()
      .position(|s| s.device == session.device)
    {
      self.refresh_sessions.remove(index);
    }
    self.updated_at = session.issued_at;
    self.refresh_sessions.push(session);
  }

  /// Removes and returns the session matching both device and token
  pub fn take_session(
    &mut self,
    device: &DeviceFingerprint,
    token_hash: &TokenHash,
  ) -> Option<RefreshTokenSession> {
    let index = self
      .refresh_sessions
      .iter()
      .position(|s| &s.device == device && &s.token_hash == token_hash)?;
    Some(self.refresh_sessions.remove(index))
  }

  /// Removes the session of one device, returning whether one existed
  pub fn remove_session(&mut self, device: &DeviceFingerprint, now: DateTime<Utc>) -> bool {
    let before = self.refresh_sessions.len();
    self.refresh_sessions.retain(|s| &s.device != device);
    let removed = self.refresh_sessions.len() != before;
    if removed {
      self.updated_at = now;
    }
    removed
  }

  /// Removes every session, returning how many were revoked
  pub fn clear_sessions(&mut self, now: DateTime<Utc>) -> usize {
    let count = self.refresh_sessions.len();
    self.refresh_sessions.clear();
    self.updated_at = now;
    count
  }

  pub fn session_for(&self, device: &DeviceFingerprint) -> Option<&RefreshTokenSession> {
    self.refresh_sessions.iter().find(|s| &s.device == device)
  }
}

/// One device's active refresh token
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshTokenSession {
  /// SHA-256 of the issued refresh token
  pub token_hash: TokenHash,
  pub device: DeviceFingerprint,
  pub issued_at: DateTime<Utc>,
}

impl RefreshTokenSession {
  pub fn new(refresh_token: &str, device: DeviceFingerprint, issued_at: DateTime<Utc>) -> Self {
    Self {
      token_hash: TokenHash::of(refresh_token),
      device,
      issued_at,
    }
  }
}

// Credential material stays out of logs
impl fmt::Debug for RefreshTokenSession {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RefreshTokenSession")
      .field("token_hash", &"***")
      .field("device", &self.device.to_string())
      .field("issued_at", &self.issued_at)
      .finish()
  }
}

/// Which of the two signing keys a bearer token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

impl TokenKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      TokenKind::Access => "access",
      TokenKind::Refresh => "refresh",
    }
  }
}

/// Claims carried by signed access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  /// Subject: the user id
  pub sub: String,
  /// Present on access tokens only
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<Role>,
  pub kind: TokenKind,
  /// Unique per issued token
  pub jti: String,
  pub iat: i64,
  pub exp: i64,
}

/// Access and refresh token returned by login and refresh
#[derive(Clone, Serialize)]
pub struct TokenPair {
  #[serde(rename = "accessToken")]
  pub access_token: String,
  #[serde(rename = "refreshToken")]
  pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("TokenPair(***)")
  }
}
