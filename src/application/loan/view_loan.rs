use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditEvent, AuditLogEntry, AuditLogRepository};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::loan::{Loan, LoanError, LoanId, LoanRepository};

#[derive(Debug, Clone)]
pub struct ViewLoanCommand {
  pub loan_id: String,
}

#[derive(Debug, Clone)]
pub struct ViewLoanResponse {
  pub loan: Loan,
}

/// Use case for a borrower checking the status of one of their loans
pub struct ViewLoanUseCase {
  loan_repo: Arc<dyn LoanRepository>,
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
}

impl ViewLoanUseCase {
  pub fn new(
    loan_repo: Arc<dyn LoanRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    Self {
      loan_repo,
      audit_repo,
      clock,
    }
  }

  /// Loans owned by someone else are reported as `NotFound`
  pub async fn execute(
    &self,
    actor: &Actor,
    command: ViewLoanCommand,
    cancel: &CancellationToken,
  ) -> Result<ViewLoanResponse, LoanError> {
    let loan_id = LoanId::parse(&command.loan_id)?;
    let user_id = UserId::parse(&actor.user_id).map_err(|_| LoanError::InvalidUserId)?;

    let repo = self.loan_repo.clone();
    let primary = Operation::new("find_loan", async move {
      repo.find_for_owner(loan_id, user_id).await
    });
    let audit = Operation::audit(
      self.audit_repo.clone(),
      AuditLogEntry::new(
        user_id,
        AuditEvent::ViewLoanStatus,
        format!("Viewed loan status for loan ID: {} by user ID: {}", loan_id, user_id),
        self.clock.now(),
      ),
    );

    let loan = run_with_audit(cancel, primary, audit)
      .await?
      .ok_or(LoanError::NotFound)?;

    Ok(ViewLoanResponse { loan })
  }
}
