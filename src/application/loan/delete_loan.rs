use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditEvent, AuditLogEntry, AuditLogRepository};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::loan::{LoanError, LoanId, LoanRepository};

#[derive(Debug, Clone)]
pub struct DeleteLoanCommand {
  pub loan_id: String,
}

/// Use case for an admin removing a loan
pub struct DeleteLoanUseCase {
  loan_repo: Arc<dyn LoanRepository>,
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
}

impl DeleteLoanUseCase {
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

  /// Deletes the loan and records `delete_loan` in parallel
  ///
  /// A failed audit write is reported as `OperationFailed` although the loan
  /// is already gone; there is no compensation.
  pub async fn execute(
    &self,
    actor: &Actor,
    command: DeleteLoanCommand,
    cancel: &CancellationToken,
  ) -> Result<(), LoanError> {
    if !actor.is_admin() {
      return Err(LoanError::Forbidden);
    }
    let loan_id = LoanId::parse(&command.loan_id)?;
    let admin_id = UserId::parse(&actor.user_id).map_err(|_| LoanError::InvalidUserId)?;

    let repo = self.loan_repo.clone();
    let primary = Operation::new("delete_loan", async move { repo.delete(loan_id).await });
    let audit = Operation::audit(
      self.audit_repo.clone(),
      AuditLogEntry::new(
        admin_id,
        AuditEvent::DeleteLoan,
        format!("Loan deleted with ID: {} by Admin ID: {}", loan_id, admin_id),
        self.clock.now(),
      ),
    );

    if !run_with_audit(cancel, primary, audit).await? {
      return Err(LoanError::NotFound);
    }

    info!(loan_id = %loan_id, admin_id = %admin_id, "Loan deleted");
    Ok(())
  }
}
