use thiserror::Error;

use super::value_objects::ValueObjectError;
use crate::domain::errors::{ErrorKind, RepositoryError};

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Account has not been activated")]
  AccountNotActivated,

  #[error("Invalid token")]
  InvalidToken,

  #[error("Token has expired")]
  ExpiredToken,

  #[error("Invalid user id")]
  InvalidUserId,

  #[error("Missing required fields")]
  MissingRequiredFields,

  #[error("Invalid email")]
  InvalidEmail,

  #[error("Invalid password: {0}")]
  InvalidPassword(ValueObjectError),

  #[error("Email already used")]
  EmailAlreadyUsed,

  #[error("Username already used")]
  UsernameAlreadyUsed,

  #[error("User not found")]
  NotFound,

  #[error("Forbidden")]
  Forbidden,

  #[error("Failed to update user: {0}")]
  FailedToUpdateUser(RepositoryError),

  #[error("Failed to send email: {0}")]
  FailedToSendEmail(#[from] MailError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token signing failed: {0}")]
  Signing(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl AuthError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
      AuthError::AccountNotActivated => ErrorKind::AccountNotActivated,
      AuthError::InvalidToken => ErrorKind::InvalidToken,
      AuthError::ExpiredToken => ErrorKind::ExpiredToken,
      AuthError::InvalidUserId => ErrorKind::InvalidUserId,
      AuthError::MissingRequiredFields => ErrorKind::MissingRequiredFields,
      AuthError::InvalidEmail => ErrorKind::InvalidEmail,
      AuthError::InvalidPassword(_) => ErrorKind::InvalidPassword,
      AuthError::EmailAlreadyUsed => ErrorKind::EmailAlreadyUsed,
      AuthError::UsernameAlreadyUsed => ErrorKind::UsernameAlreadyUsed,
      AuthError::NotFound => ErrorKind::NotFound,
      AuthError::Forbidden => ErrorKind::Forbidden,
      AuthError::FailedToUpdateUser(_) => ErrorKind::FailedToUpdateUser,
      AuthError::FailedToSendEmail(_) => ErrorKind::FailedToSendEmail,
      AuthError::Repository(_)
      | AuthError::Hash(_)
      | AuthError::Signing(_)
      | AuthError::Internal(_) => ErrorKind::InternalServer,
    }
  }
}

/// Signed token issuing and verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
  #[error("Signing key unavailable or signing failed: {0}")]
  Signing(String),

  #[error("Token has expired")]
  Expired,

  #[error("Token is invalid: {0}")]
  Invalid(String),
}

impl From<TokenError> for AuthError {
  fn from(error: TokenError) -> Self {
    match error {
      TokenError::Signing(reason) => AuthError::Signing(reason),
      TokenError::Expired => AuthError::ExpiredToken,
      TokenError::Invalid(_) => AuthError::InvalidToken,
    }
  }
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Outbound email errors
#[derive(Debug, Error)]
pub enum MailError {
  #[error("Mail delivery failed: {0}")]
  DeliveryFailed(String),
}
