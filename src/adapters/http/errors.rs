use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::audit::AuditError;
use crate::domain::auth::errors::AuthError;
use crate::domain::errors::ErrorKind;
use crate::domain::loan::LoanError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
///
/// The body is always `{"error": <kind>, "message": <text>}`. Messages of
/// server-side failures are logged and replaced with a generic text.
#[derive(Debug)]
pub enum ApiError {
  /// Malformed request body, path or query (400 Bad Request)
  Validation(String),

  /// Error classified by the domain
  Domain { kind: ErrorKind, message: String },
}

impl ApiError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      ApiError::Validation(_) => ErrorKind::BadRequest,
      ApiError::Domain { kind, .. } => *kind,
    }
  }

  fn from_kind(kind: ErrorKind, message: impl fmt::Display) -> Self {
    ApiError::Domain {
      kind,
      message: message.to_string(),
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Domain { kind, message } => write!(f, "{}: {}", kind.as_str(), message),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let kind = self.kind();

    let message = match self {
      ApiError::Validation(msg) => msg.clone(),
      ApiError::Domain { message, .. } if status.is_server_error() => {
        // Don't expose internal error details
        tracing::error!(kind = kind.as_str(), error = %message, "Request failed");
        match kind {
          ErrorKind::FailedToSendEmail => "Failed to send email".to_string(),
          ErrorKind::FailedToUpdateUser => "Failed to update user".to_string(),
          ErrorKind::OperationFailed => "Operation could not be completed".to_string(),
          _ => "An internal server error occurred".to_string(),
        }
      }
      ApiError::Domain { message, .. } => message.clone(),
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: kind.as_str().to_string(),
        message,
      })
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    ApiError::from_kind(error.kind(), error)
  }
}

impl From<LoanError> for ApiError {
  fn from(error: LoanError) -> Self {
    ApiError::from_kind(error.kind(), error)
  }
}

impl From<AuditError> for ApiError {
  fn from(error: AuditError) -> Self {
    ApiError::from_kind(error.kind(), error)
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors.iter().map(move |error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        })
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}
