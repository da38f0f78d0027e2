use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditEvent, AuditLogEntry, AuditLogRepository};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::loan::{Loan, LoanError, LoanQuery, LoanRepository, LoanStatus};
use crate::domain::pagination::{PageLimits, PageRequest, SortOrder};

/// Listing filter as received from the boundary
#[derive(Debug, Clone, Default)]
pub struct ListLoansCommand {
  /// `all`, empty or absent lists every status
  pub status: Option<String>,
  /// `asc`; anything else sorts newest first
  pub order: Option<String>,
  pub limit: Option<u64>,
  pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ListLoansResponse {
  pub loans: Vec<Loan>,
  /// The requested offset
  pub current_page: u64,
  pub per_page: u64,
  pub total: u64,
  pub total_pages: u64,
}

/// Use case for the admin overview of all loans
pub struct ListLoansUseCase {
  loan_repo: Arc<dyn LoanRepository>,
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
  page_limits: PageLimits,
}

impl ListLoansUseCase {
  pub fn new(
    loan_repo: Arc<dyn LoanRepository>,
    audit_repo: Arc<dyn AuditLogRepository>,
    clock: Arc<dyn Clock>,
    page_limits: PageLimits,
  ) -> Self {
    Self {
      loan_repo,
      audit_repo,
      clock,
      page_limits,
    }
  }

  pub async fn execute(
    &self,
    actor: &Actor,
    command: ListLoansCommand,
    cancel: &CancellationToken,
  ) -> Result<ListLoansResponse, LoanError> {
    if !actor.is_admin() {
      return Err(LoanError::Forbidden);
    }
    let admin_id = UserId::parse(&actor.user_id).map_err(|_| LoanError::InvalidUserId)?;

    let page = PageRequest::new(command.limit, command.offset, self.page_limits);
    let query = LoanQuery {
      status: LoanStatus::parse_filter(command.status.as_deref())?,
      order: SortOrder::parse_lenient(command.order.as_deref()),
      page,
    };

    let repo = self.loan_repo.clone();
    let primary = Operation::new("list_loans", async move { repo.list(&query).await });
    let audit = Operation::audit(
      self.audit_repo.clone(),
      AuditLogEntry::new(
        admin_id,
        AuditEvent::ViewAllLoans,
        format!("Viewed all loans by Admin ID: {}", admin_id),
        self.clock.now(),
      ),
    );

    let result = run_with_audit(cancel, primary, audit).await?;

    Ok(ListLoansResponse {
      loans: result.items,
      current_page: page.offset,
      per_page: page.limit,
      total: result.total,
      total_pages: page.total_pages(result.total),
    })
  }
}
