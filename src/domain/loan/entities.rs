use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::LoanError;
use super::value_objects::{LoanId, LoanStatus, LoanTerms, StatusChange};
use crate::domain::auth::value_objects::UserId;
use crate::domain::pagination::{PageRequest, SortOrder};

/// A loan application owned by the borrower who created it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
  pub id: LoanId,
  pub user_id: UserId,
  pub amount: Decimal,
  pub interest_rate: Decimal,
  pub term_months: u32,
  pub status: LoanStatus,
  /// Admin who made the last status decision
  #[serde(skip_serializing_if = "Option::is_none")]
  pub admin_id: Option<UserId>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub approval_date: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rejection_reason: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Loan {
  pub fn new(user_id: UserId, terms: LoanTerms, now: DateTime<Utc>) -> Self {
    Self {
      id: LoanId::new(),
      user_id,
      amount: terms.amount,
      interest_rate: terms.interest_rate,
      term_months: terms.term_months,
      status: LoanStatus::Pending,
      admin_id: None,
      approval_date: None,
      rejection_reason: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Checks that `change` is a legal move from the current status
  pub fn ensure_can_apply(&self, change: &StatusChange) -> Result<(), LoanError> {
    let target = change.target();
    if !self.status.can_transition_to(target) {
      return Err(LoanError::InvalidStatusTransition {
        from: self.status.to_string(),
        to: target.to_string(),
      });
    }
    Ok(())
  }

  /// Applies an admin decision
  ///
  /// Approval stamps the approval date and clears any rejection reason;
  /// rejection stores the reason and clears the approval date.
  pub fn apply_status_change(
    &mut self,
    change: StatusChange,
    admin_id: UserId,
    now: DateTime<Utc>,
  ) -> Result<(), LoanError> {
    self.ensure_can_apply(&change)?;

    self.status = change.target();
    match change {
      StatusChange::Approve => {
        self.approval_date = Some(now);
        self.rejection_reason = None;
      }
      StatusChange::Reject { reason } => {
        self.approval_date = None;
        self.rejection_reason = Some(reason);
      }
    }
    self.admin_id = Some(admin_id);
    self.updated_at = now;
    Ok(())
  }
}

/// Listing filter for the admin loan overview
#[derive(Debug, Clone, Default)]
pub struct LoanQuery {
  /// `None` lists every status
  pub status: Option<LoanStatus>,
  pub order: SortOrder,
  pub page: PageRequest,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn pending_loan() -> Loan {
    let terms = LoanTerms::new(dec!(5000), dec!(7.5), 24).unwrap();
    Loan::new(UserId::new(), terms, Utc::now())
  }

  #[test]
  fn test_new_loan_is_pending() {
    let loan = pending_loan();
    assert_eq!(loan.status, LoanStatus::Pending);
    assert!(loan.admin_id.is_none());
    assert!(loan.approval_date.is_none());
  }

  #[test]
  fn test_approve_sets_date_and_clears_reason() {
    let mut loan = pending_loan();
    let admin = UserId::new();
    let now = Utc::now();

    loan.apply_status_change(StatusChange::Approve, admin, now).unwrap();

    assert_eq!(loan.status, LoanStatus::Approved);
    assert_eq!(loan.approval_date, Some(now));
    assert!(loan.rejection_reason.is_none());
    assert_eq!(loan.admin_id, Some(admin));
  }

  #[test]
  fn test_reject_stores_reason_and_clears_date() {
    let mut loan = pending_loan();
    let change = StatusChange::Reject {
      reason: "insufficient income".to_string(),
    };

    loan.apply_status_change(change, UserId::new(), Utc::now()).unwrap();

    assert_eq!(loan.status, LoanStatus::Rejected);
    assert!(loan.approval_date.is_none());
    assert_eq!(loan.rejection_reason.as_deref(), Some("insufficient income"));
  }

  #[test]
  fn test_terminal_states_reject_changes() {
    let mut loan = pending_loan();
    loan
      .apply_status_change(StatusChange::Approve, UserId::new(), Utc::now())
      .unwrap();

    let result = loan.apply_status_change(
      StatusChange::Reject {
        reason: "changed my mind".to_string(),
      },
      UserId::new(),
      Utc::now(),
    );

    assert!(matches!(result, Err(LoanError::InvalidStatusTransition { .. })));
    assert_eq!(loan.status, LoanStatus::Approved);
  }
}
