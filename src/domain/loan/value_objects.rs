use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::LoanError;

// LoanId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn parse(raw: &str) -> Result<Self, LoanError> {
    Uuid::parse_str(raw.trim())
      .map(Self)
      .map_err(|_| LoanError::InvalidLoanId)
  }

  pub fn into_inner(self) -> Uuid {
    self.0
  }
}

impl Default for LoanId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for LoanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// LoanStatus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl LoanStatus {
  pub fn can_transition_to(&self, new_status: LoanStatus) -> bool {
    match (self, new_status) {
      (LoanStatus::Pending, LoanStatus::Approved) => true,
      (LoanStatus::Pending, LoanStatus::Rejected) => true,
      // Approved and Rejected are terminal states
      _ => false,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      LoanStatus::Pending => "pending",
      LoanStatus::Approved => "approved",
      LoanStatus::Rejected => "rejected",
    }
  }

  /// Parses a listing filter where `all` or an empty value means no filter
  pub fn parse_filter(value: Option<&str>) -> Result<Option<Self>, LoanError> {
    match value.map(str::trim) {
      None | Some("") => Ok(None),
      Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
      Some(v) => v.parse().map(Some),
    }
  }
}

impl FromStr for LoanStatus {
  type Err = LoanError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "pending" => Ok(LoanStatus::Pending),
      "approved" => Ok(LoanStatus::Approved),
      "rejected" => Ok(LoanStatus::Rejected),
      _ => Err(LoanError::BadRequest(format!("Unknown loan status: {}", s))),
    }
  }
}

impl fmt::Display for LoanStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A validated admin decision on a pending loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
  Approve,
  Reject { reason: String },
}

impl StatusChange {
  /// Builds a decision from the raw status literal and optional reason
  ///
  /// Fails with `BadRequest` for unknown literals, for `pending`, and for a
  /// rejection without a non-empty reason.
  pub fn parse(status: &str, rejection_reason: Option<&str>) -> Result<Self, LoanError> {
    match status.parse::<LoanStatus>()? {
      LoanStatus::Approved => Ok(StatusChange::Approve),
      LoanStatus::Rejected => match rejection_reason.map(str::trim) {
        Some(reason) if !reason.is_empty() => Ok(StatusChange::Reject {
          reason: reason.to_string(),
        }),
        _ => Err(LoanError::BadRequest(
          "Rejection reason must be provided when status is rejected".to_string(),
        )),
      },
      LoanStatus::Pending => Err(LoanError::BadRequest(
        "Loans cannot be moved back to pending".to_string(),
      )),
    }
  }

  pub fn target(&self) -> LoanStatus {
    match self {
      StatusChange::Approve => LoanStatus::Approved,
      StatusChange::Reject { .. } => LoanStatus::Rejected,
    }
  }
}

/// Amount, rate and term requested by a borrower
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanTerms {
  pub amount: Decimal,
  /// Annual rate in percent
  pub interest_rate: Decimal,
  pub term_months: u32,
}

impl LoanTerms {
  pub fn new(amount: Decimal, interest_rate: Decimal, term_months: u32) -> Result<Self, LoanError> {
    if amount <= Decimal::ZERO {
      return Err(LoanError::BadRequest("Amount must be positive".to_string()));
    }
    if interest_rate < Decimal::ZERO {
      return Err(LoanError::BadRequest(
        "Interest rate must not be negative".to_string(),
      ));
    }
    if term_months == 0 {
      return Err(LoanError::BadRequest("Term must be at least one month".to_string()));
    }
    Ok(Self {
      amount,
      interest_rate,
      term_months,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_status_transitions() {
    assert!(LoanStatus::Pending.can_transition_to(LoanStatus::Approved));
    assert!(LoanStatus::Pending.can_transition_to(LoanStatus::Rejected));
    assert!(!LoanStatus::Approved.can_transition_to(LoanStatus::Rejected));
    assert!(!LoanStatus::Rejected.can_transition_to(LoanStatus::Pending));
    assert!(!LoanStatus::Pending.can_transition_to(LoanStatus::Pending));
  }

  #[test]
  fn test_status_filter() {
    assert_eq!(LoanStatus::parse_filter(None).unwrap(), None);
    assert_eq!(LoanStatus::parse_filter(Some("")).unwrap(), None);
    assert_eq!(LoanStatus::parse_filter(Some("ALL")).unwrap(), None);
    assert_eq!(
      LoanStatus::parse_filter(Some("approved")).unwrap(),
      Some(LoanStatus::Approved)
    );
    assert!(LoanStatus::parse_filter(Some("closed")).is_err());
  }

  #[test]
  fn test_status_change_parse() {
    assert_eq!(StatusChange::parse("approved", None).unwrap(), StatusChange::Approve);
    assert_eq!(
      StatusChange::parse("rejected", Some(" low score ")).unwrap(),
      StatusChange::Reject {
        reason: "low score".to_string()
      }
    );
    assert!(matches!(
      StatusChange::parse("rejected", None),
      Err(LoanError::BadRequest(_))
    ));
    assert!(matches!(
      StatusChange::parse("rejected", Some("  ")),
      Err(LoanError::BadRequest(_))
    ));
    assert!(matches!(
      StatusChange::parse("pending", None),
      Err(LoanError::BadRequest(_))
    ));
    assert!(matches!(
      StatusChange::parse("shipped", None),
      Err(LoanError::BadRequest(_))
    ));
  }

  #[test]
  fn test_loan_terms_validation() {
    assert!(LoanTerms::new(dec!(1000), dec!(5.5), 12).is_ok());
    assert!(LoanTerms::new(dec!(0), dec!(5.5), 12).is_err());
    assert!(LoanTerms::new(dec!(1000), dec!(-1), 12).is_err());
    assert!(LoanTerms::new(dec!(1000), dec!(5.5), 0).is_err());
  }

  #[test]
  fn test_loan_id_parse() {
    let id = LoanId::new();
    assert_eq!(LoanId::parse(&id.to_string()).unwrap(), id);
    assert!(matches!(LoanId::parse("L1"), Err(LoanError::InvalidLoanId)));
  }
}
