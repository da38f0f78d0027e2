use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable classification of every error the core can return
///
/// The HTTP boundary translates a kind into a status code and a JSON body; the
/// strings returned by [`ErrorKind::as_str`] are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  InvalidCredentials,
  AccountNotActivated,
  InvalidToken,
  ExpiredToken,
  InvalidUserId,
  InvalidLoanId,
  MissingRequiredFields,
  InvalidEmail,
  InvalidPassword,
  EmailAlreadyUsed,
  UsernameAlreadyUsed,
  NotFound,
  Forbidden,
  BadRequest,
  FailedToUpdateUser,
  FailedToSendEmail,
  OperationFailed,
  Cancelled,
  InternalServer,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorKind::InvalidCredentials => "invalid_credentials",
      ErrorKind::AccountNotActivated => "account_not_activated",
      ErrorKind::InvalidToken => "invalid_token",
      ErrorKind::ExpiredToken => "expired_token",
      ErrorKind::InvalidUserId => "invalid_user_id",
      ErrorKind::InvalidLoanId => "invalid_loan_id",
      ErrorKind::MissingRequiredFields => "missing_required_fields",
      ErrorKind::InvalidEmail => "invalid_email",
      ErrorKind::InvalidPassword => "invalid_password",
      ErrorKind::EmailAlreadyUsed => "email_already_used",
      ErrorKind::UsernameAlreadyUsed => "username_already_used",
      ErrorKind::NotFound => "not_found",
      ErrorKind::Forbidden => "forbidden",
      ErrorKind::BadRequest => "bad_request",
      ErrorKind::FailedToUpdateUser => "failed_to_update_user",
      ErrorKind::FailedToSendEmail => "failed_to_send_email",
      ErrorKind::OperationFailed => "operation_failed",
      ErrorKind::Cancelled => "cancelled",
      ErrorKind::InternalServer => "internal_server_error",
    }
  }

  /// HTTP-style status associated with this kind
  pub fn status_code(&self) -> u16 {
    match self {
      ErrorKind::InvalidCredentials
      | ErrorKind::AccountNotActivated
      | ErrorKind::InvalidToken
      | ErrorKind::ExpiredToken => 401,
      ErrorKind::Forbidden => 403,
      ErrorKind::NotFound => 404,
      ErrorKind::InvalidUserId
      | ErrorKind::InvalidLoanId
      | ErrorKind::MissingRequiredFields
      | ErrorKind::InvalidEmail
      | ErrorKind::InvalidPassword
      | ErrorKind::EmailAlreadyUsed
      | ErrorKind::UsernameAlreadyUsed
      | ErrorKind::BadRequest => 400,
      // Client closed request
      ErrorKind::Cancelled => 499,
      ErrorKind::FailedToUpdateUser
      | ErrorKind::FailedToSendEmail
      | ErrorKind::OperationFailed
      | ErrorKind::InternalServer => 500,
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Repository-related errors shared by every persistence port
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
  #[error("Storage unavailable: {0}")]
  Unavailable(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Conflicting update: {0}")]
  Conflict(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_codes() {
    assert_eq!(ErrorKind::InvalidCredentials.status_code(), 401);
    assert_eq!(ErrorKind::ExpiredToken.status_code(), 401);
    assert_eq!(ErrorKind::Forbidden.status_code(), 403);
    assert_eq!(ErrorKind::NotFound.status_code(), 404);
    assert_eq!(ErrorKind::EmailAlreadyUsed.status_code(), 400);
    assert_eq!(ErrorKind::OperationFailed.status_code(), 500);
  }

  #[test]
  fn test_kind_serializes_as_snake_case() {
    let json = serde_json::to_string(&ErrorKind::AccountNotActivated).unwrap();
    assert_eq!(json, "\"account_not_activated\"");
    assert_eq!(ErrorKind::AccountNotActivated.as_str(), "account_not_activated");
  }
}
