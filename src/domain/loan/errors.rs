use thiserror::Error;

use crate::domain::errors::{ErrorKind, RepositoryError};

#[derive(Debug, Error)]
pub enum LoanError {
  #[error("Invalid loan id")]
  InvalidLoanId,

  #[error("Invalid user id")]
  InvalidUserId,

  #[error("Bad request: {0}")]
  BadRequest(String),

  #[error("Invalid status transition from {from} to {to}")]
  InvalidStatusTransition { from: String, to: String },

  #[error("Forbidden")]
  Forbidden,

  #[error("Loan not found")]
  NotFound,

  /// At least one operation of a fan-out failed; the primary write may
  /// already be committed
  #[error("Operation failed")]
  OperationFailed { primary_committed: bool },

  #[error("Operation cancelled")]
  Cancelled,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

impl LoanError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      LoanError::InvalidLoanId => ErrorKind::InvalidLoanId,
      LoanError::InvalidUserId => ErrorKind::InvalidUserId,
      LoanError::BadRequest(_) | LoanError::InvalidStatusTransition { .. } => ErrorKind::BadRequest,
      LoanError::Forbidden => ErrorKind::Forbidden,
      LoanError::NotFound => ErrorKind::NotFound,
      LoanError::OperationFailed { .. } => ErrorKind::OperationFailed,
      LoanError::Cancelled => ErrorKind::Cancelled,
      LoanError::Repository(_) => ErrorKind::InternalServer,
    }
  }
}
