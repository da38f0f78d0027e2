use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditEvent, AuditLogEntry, AuditLogRepository};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::loan::{Loan, LoanError, LoanId, LoanRepository, StatusChange};

/// Admin decision on a loan
#[derive(Debug, Clone)]
pub struct UpdateLoanStatusCommand {
  pub loan_id: String,
  /// `approved` or `rejected`
  pub status: String,
  /// Required when rejecting
  pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateLoanStatusResponse {
  pub loan: Loan,
}

/// Use case for approving or rejecting a pending loan
pub struct UpdateLoanStatusUseCase {
  loan_repo: Arc<dyn LoanRepository>,
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
}

impl UpdateLoanStatusUseCase {
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

  /// Validates the decision against the stored loan, then writes the new
  /// status and its audit entry in parallel
  ///
  /// # Errors
  /// * `Forbidden` for non-admin callers
  /// * `BadRequest` for an unknown or `pending` target, a rejection without
  ///   reason, or a loan that already left `pending`; nothing is written
  /// * `NotFound` for unknown loans
  /// * `OperationFailed` if either parallel write fails
  pub async fn execute(
    &self,
    actor: &Actor,
    command: UpdateLoanStatusCommand,
    cancel: &CancellationToken,
  ) -> Result<UpdateLoanStatusResponse, LoanError> {
    if !actor.is_admin() {
      return Err(LoanError::Forbidden);
    }
    let loan_id = LoanId::parse(&command.loan_id)?;
    let admin_id = UserId::parse(&actor.user_id).map_err(|_| LoanError::InvalidUserId)?;
    let change = StatusChange::parse(&command.status, command.rejection_reason.as_deref())?;

    let current = self
      .loan_repo
      .find_by_id(loan_id)
      .await?
      .ok_or(LoanError::NotFound)?;
    current.ensure_can_apply(&change)?;

    let now = self.clock.now();
    let target = change.target();

    let repo = self.loan_repo.clone();
    let primary = Operation::new("update_loan_status", async move {
      repo.update_status(loan_id, change, admin_id, now).await
    });
    let audit = Operation::audit(
      self.audit_repo.clone(),
      AuditLogEntry::new(
        admin_id,
        AuditEvent::UpdateLoanStatus,
        format!(
          "Loan status updated to {} for Loan ID: {} by Admin ID: {}",
          target, loan_id, admin_id
        ),
        now,
      ),
    );

    let loan = run_with_audit(cancel, primary, audit).await?;

    info!(loan_id = %loan_id, admin_id = %admin_id, status = %target, "Loan status updated");
    Ok(UpdateLoanStatusResponse { loan })
  }
}
