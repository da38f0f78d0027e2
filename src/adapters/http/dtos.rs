use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::application::auth::UserProfile;
use crate::domain::audit::AuditLogEntry;
use crate::domain::auth::entities::TokenPair;
use crate::domain::auth::value_objects::UserId;
use crate::domain::loan::Loan;

// Email and password rules live in the domain so that the error kinds
// (`invalid_email`, `invalid_password`) stay stable; DTOs only bound sizes.

/// Request for user registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[serde(default)]
  #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
  pub username: String,

  #[serde(default)]
  #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
  pub email: String,

  #[serde(default)]
  pub password: String,

  #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
  pub name: Option<String>,

  #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
  pub bio: Option<String>,
}

/// Request for user login
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
  #[serde(default)]
  pub email: String,

  #[serde(default)]
  pub password: String,
}

impl fmt::Debug for LoginRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoginRequest")
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}

/// Request for a refresh token rotation
#[derive(Clone, Deserialize)]
pub struct RefreshRequest {
  #[serde(default)]
  pub user_id: String,

  #[serde(default, alias = "refresh_token", alias = "refreshToken")]
  pub token: String,
}

impl fmt::Debug for RefreshRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RefreshRequest")
      .field("user_id", &self.user_id)
      .field("token", &"***")
      .finish()
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
  /// Revoke the sessions of every device, not only the calling one
  #[serde(default)]
  pub all_devices: bool,
}

/// Body of the resend-verification and password-reset requests
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
  #[serde(default)]
  pub email: String,
}

#[derive(Clone, Deserialize)]
pub struct PasswordUpdateRequest {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
  #[serde(default)]
  pub token: String,
}

impl fmt::Debug for PasswordUpdateRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PasswordUpdateRequest")
      .field("email", &self.email)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLoanRequest {
  pub amount: Decimal,
  pub interest_rate: Decimal,
  #[serde(alias = "term")]
  #[validate(range(min = 1, max = 600, message = "Term must be between 1 and 600 months"))]
  pub term_months: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLoanStatusRequest {
  pub status: String,
  pub rejection_reason: Option<String>,
}

/// Query of the admin loan listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanListQuery {
  pub status: Option<String>,
  pub order: Option<String>,
  pub limit: Option<u64>,
  pub offset: Option<u64>,
}

/// Query of the audit log listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
  pub event: Option<String>,
  pub order: Option<String>,
  pub limit: Option<u64>,
  pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
  pub user_id: UserId,
  pub username: String,
  pub email: String,
  pub message: String,
}

/// Response of login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokensResponse {
  pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
  /// Number of sessions that were revoked
  pub revoked_sessions: usize,
  pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanResponse {
  pub loan: Loan,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanListResponse {
  pub loans: Vec<Loan>,
  pub current_page: u64,
  pub per_page: u64,
  pub total: u64,
  pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogListResponse {
  pub logs: Vec<AuditLogEntry>,
  pub current_page: u64,
  pub per_page: u64,
  pub total: u64,
  pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
  pub users: Vec<UserProfile>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

impl SuccessResponse {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Stable error kind, e.g. `invalid_token`
  pub error: String,

  /// Human-readable error message
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_register_request_bounds() {
    let request = RegisterRequest {
      username: "u".repeat(65),
      email: "alice@x.com".to_string(),
      password: "Secret123!".to_string(),
      name: None,
      bio: None,
    };
    assert!(request.validate().is_err());

    let request = RegisterRequest {
      username: "alice".to_string(),
      ..request
    };
    assert!(request.validate().is_ok());
  }

  #[test]
  fn test_create_loan_accepts_term_alias() {
    let request: CreateLoanRequest =
      serde_json::from_str(r#"{"amount": "2500.00", "interest_rate": 4.5, "term": 12}"#).unwrap();

    assert_eq!(request.term_months, 12);
    assert!(request.validate().is_ok());
  }

  #[test]
  fn test_refresh_request_accepts_token_aliases() {
    let request: RefreshRequest =
      serde_json::from_str(r#"{"user_id": "abc", "refreshToken": "t"}"#).unwrap();
    assert_eq!(request.token, "t");
    assert!(!format!("{:?}", request).contains("\"t\""));
  }

  #[test]
  fn test_tokens_response_uses_camel_case_fields() {
    let response = TokensResponse {
      tokens: TokenPair {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
      },
    };
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["tokens"]["accessToken"], "a");
    assert_eq!(json["tokens"]["refreshToken"], "r");
  }
}
