use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditEvent, AuditLogEntry, AuditLogRepository};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::loan::{Loan, LoanError, LoanRepository, LoanTerms};

/// Command for applying for a loan
#[derive(Debug, Clone)]
pub struct CreateLoanCommand {
  pub amount: Decimal,
  /// Annual rate in percent
  pub interest_rate: Decimal,
  pub term_months: u32,
}

#[derive(Debug, Clone)]
pub struct CreateLoanResponse {
  pub loan: Loan,
}

/// Use case for creating a pending loan owned by the caller
pub struct CreateLoanUseCase {
  loan_repo: Arc<dyn LoanRepository>,
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
}

impl CreateLoanUseCase {
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

  /// Stores the loan and its `create_loan` audit entry in parallel
  ///
  /// # Errors
  /// Returns `LoanError::OperationFailed` if either write fails, even when
  /// the loan itself was stored
  pub async fn execute(
    &self,
    actor: &Actor,
    command: CreateLoanCommand,
    cancel: &CancellationToken,
  ) -> Result<CreateLoanResponse, LoanError> {
    let user_id = UserId::parse(&actor.user_id).map_err(|_| LoanError::InvalidUserId)?;
    let terms = LoanTerms::new(command.amount, command.interest_rate, command.term_months)?;

    let now = self.clock.now();
    let loan = Loan::new(user_id, terms, now);

    let repo = self.loan_repo.clone();
    let primary = Operation::new("create_loan", async move { repo.create(loan).await });
    let audit = Operation::audit(
      self.audit_repo.clone(),
      AuditLogEntry::new(
        user_id,
        AuditEvent::CreateLoan,
        format!("Loan created by user: {}", user_id),
        now,
      ),
    );

    let loan = run_with_audit(cancel, primary, audit).await?;

    info!(loan_id = %loan.id, user_id = %user_id, "Loan created");
    Ok(CreateLoanResponse { loan })
  }
}
