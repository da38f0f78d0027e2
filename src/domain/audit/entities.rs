use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::AuditError;
use crate::domain::auth::value_objects::UserId;
use crate::domain::pagination::{PageRequest, SortOrder};

/// Business events recorded alongside the operation that caused them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
  CreateLoan,
  ViewLoanStatus,
  ViewAllLoans,
  UpdateLoanStatus,
  DeleteLoan,
  ViewLogs,
}

impl AuditEvent {
  pub fn as_str(&self) -> &'static str {
    match self {
      AuditEvent::CreateLoan => "create_loan",
      AuditEvent::ViewLoanStatus => "view_loan_status",
      AuditEvent::ViewAllLoans => "view_all_loans",
      AuditEvent::UpdateLoanStatus => "update_loan_status",
      AuditEvent::DeleteLoan => "delete_loan",
      AuditEvent::ViewLogs => "view_logs",
    }
  }
}

impl FromStr for AuditEvent {
  type Err = AuditError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "create_loan" => Ok(AuditEvent::CreateLoan),
      "view_loan_status" => Ok(AuditEvent::ViewLoanStatus),
      "view_all_loans" => Ok(AuditEvent::ViewAllLoans),
      "update_loan_status" => Ok(AuditEvent::UpdateLoanStatus),
      "delete_loan" => Ok(AuditEvent::DeleteLoan),
      "view_logs" => Ok(AuditEvent::ViewLogs),
      _ => Err(AuditError::BadRequest(format!("Unknown event: {}", s))),
    }
  }
}

impl fmt::Display for AuditEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Append-only audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditLogEntry {
  pub id: Uuid,
  pub timestamp: DateTime<Utc>,
  /// Acting user
  pub user_id: UserId,
  pub event: AuditEvent,
  pub details: String,
}

impl AuditLogEntry {
  pub fn new(
    user_id: UserId,
    event: AuditEvent,
    details: impl Into<String>,
    timestamp: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      timestamp,
      user_id,
      event,
      details: details.into(),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
  /// `None` lists every event
  pub event: Option<AuditEvent>,
  pub order: SortOrder,
  pub page: PageRequest,
  /// Entry left out of both the page and the total
  pub exclude: Option<Uuid>,
}
