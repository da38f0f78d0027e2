use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Password is too short (minimum {min} characters)")]
  PasswordTooShort { min: usize },

  #[error("Password is too long (maximum {max} characters)")]
  PasswordTooLong { max: usize },

  #[error("Password must contain an uppercase letter, a lowercase letter, a digit and a special character")]
  PasswordTooWeak,

  #[error("Password must not be empty")]
  EmptyPassword,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Invalid identifier: {0}")]
  InvalidId(String),

  #[error("Unknown role: {0}")]
  UnknownRole(String),
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    // Normalize to lowercase
    let email = email.into().trim().to_lowercase();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail);
    }

    Ok(Self(email))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password enforcing the strength policy
  ///
  /// Used wherever a password is chosen (registration, reset). A valid password
  /// is 8 to 128 characters long and mixes upper case, lower case, digits and
  /// at least one non-alphanumeric character.
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = Self(password.into());
    let length = password.0.chars().count();

    if length < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if length > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    let has_upper = password.0.chars().any(|c| c.is_uppercase());
    let has_lower = password.0.chars().any(|c| c.is_lowercase());
    let has_digit = password.0.chars().any(|c| c.is_ascii_digit());
    let has_special = password
      .0
      .chars()
      .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !(has_upper && has_lower && has_digit && has_special) {
      return Err(ValueObjectError::PasswordTooWeak);
    }

    Ok(password)
  }

  /// Wraps a password presented at login; only emptiness is rejected so that
  /// policy changes never lock out existing accounts
  pub fn for_verification(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = Self(password.into());
    if password.0.is_empty() {
      return Err(ValueObjectError::EmptyPassword);
    }
    Ok(password)
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a PasswordHash from an existing PHC string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    argon2::PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// TokenHash Value Object (SHA-256 of a refresh token)
// ============================================================================

/// Refresh tokens are stored only as their SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHash(String);

impl TokenHash {
  pub fn of(token: &str) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    Self(hex::encode(hasher.finalize()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// UserId Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  /// Parses an opaque identifier received from outside the core
  pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
    Uuid::parse_str(raw.trim())
      .map(Self)
      .map_err(|_| ValueObjectError::InvalidId(raw.to_string()))
  }

  pub fn into_inner(self) -> Uuid {
    self.0
  }
}

impl Default for UserId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<Uuid> for UserId {
  fn from(uuid: Uuid) -> Self {
    Self(uuid)
  }
}

impl From<UserId> for Uuid {
  fn from(user_id: UserId) -> Self {
    user_id.0
  }
}

// ============================================================================
// Role
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Admin => "admin",
    }
  }
}

impl FromStr for Role {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "user" => Ok(Role::User),
      "admin" => Ok(Role::Admin),
      _ => Err(ValueObjectError::UnknownRole(s.to_string())),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// DeviceFingerprint
// ============================================================================

/// Coarse per-device partition key for refresh sessions
///
/// Derived from the client address and user agent at request time. It is not
/// a security boundary: two browsers behind one NAT with the same agent share
/// a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceFingerprint(String);

impl DeviceFingerprint {
  pub fn derive(client_ip: &str, user_agent: &str) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(client_ip.as_bytes());
    hasher.update(b"|");
    hasher.update(user_agent.as_bytes());
    Self(hex::encode(hasher.finalize()))
  }

  /// Rebuilds a fingerprint that was derived earlier
  pub fn from_raw(raw: impl Into<String>) -> Self {
    Self(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for DeviceFingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Short prefix is enough to correlate log lines
    let prefix: String = self.0.chars().take(12).collect();
    f.write_str(&prefix)
  }
}

// ============================================================================
// Actor
// ============================================================================

/// Identity extracted from a verified access token by the boundary layer
///
/// Carried into every use case as an explicit parameter. The user id stays a
/// raw string until a use case parses it, so a malformed subject surfaces as
/// `InvalidUserId` in the operation that needed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
  pub user_id: String,
  pub role: Role,
}

impl Actor {
  pub fn new(user_id: impl Into<String>, role: Role) -> Self {
    Self {
      user_id: user_id.into(),
      role,
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}
