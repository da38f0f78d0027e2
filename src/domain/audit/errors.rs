use thiserror::Error;

use crate::domain::errors::{ErrorKind, RepositoryError};

#[derive(Debug, Error)]
pub enum AuditError {
  #[error("Invalid user id")]
  InvalidUserId,

  #[error("Bad request: {0}")]
  BadRequest(String),

  #[error("Forbidden")]
  Forbidden,

  #[error("Operation failed")]
  OperationFailed { primary_committed: bool },

  #[error("Operation cancelled")]
  Cancelled,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

impl AuditError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AuditError::InvalidUserId => ErrorKind::InvalidUserId,
      AuditError::BadRequest(_) => ErrorKind::BadRequest,
      AuditError::Forbidden => ErrorKind::Forbidden,
      AuditError::OperationFailed { .. } => ErrorKind::OperationFailed,
      AuditError::Cancelled => ErrorKind::Cancelled,
      AuditError::Repository(_) => ErrorKind::InternalServer,
    }
  }
}
