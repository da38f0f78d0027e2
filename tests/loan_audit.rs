use chrono::Duration;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use loanbook::application::audit::{ViewAuditLogCommand, ViewAuditLogUseCase};
use loanbook::application::loan::{
  CreateLoanCommand, CreateLoanUseCase, DeleteLoanCommand, DeleteLoanUseCase, ListLoansCommand,
  ListLoansUseCase, UpdateLoanStatusCommand, UpdateLoanStatusUseCase, ViewLoanCommand,
  ViewLoanUseCase,
};
use loanbook::domain::audit::{AuditError, AuditEvent};
use loanbook::domain::auth::{Actor, Role, UserId};
use loanbook::domain::clock::Clock;
use loanbook::domain::loan::{Loan, LoanError, LoanId, LoanRepository, LoanStatus};
use loanbook::domain::pagination::PageLimits;
use loanbook::domain::ErrorKind;
use loanbook::infrastructure::clock::ManualClock;
use loanbook::infrastructure::persistence::memory::{
  InMemoryAuditLogRepository, InMemoryLoanRepository,
};

struct TestApp {
  loans: Arc<InMemoryLoanRepository>,
  audit: Arc<InMemoryAuditLogRepository>,
  clock: Arc<ManualClock>,
  create: CreateLoanUseCase,
  view: ViewLoanUseCase,
  list: ListLoansUseCase,
  update_status: UpdateLoanStatusUseCase,
  delete: DeleteLoanUseCase,
  view_logs: ViewAuditLogUseCase,
  cancel: CancellationToken,
}

impl TestApp {
  fn new() -> Self {
    let loans = Arc::new(InMemoryLoanRepository::new());
    let audit = Arc::new(InMemoryAuditLogRepository::new());
    let clock = Arc::new(ManualClock::default());
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let limits = PageLimits {
      default_limit: 2,
      max_limit: 5,
    };

    Self {
      create: CreateLoanUseCase::new(loans.clone(), audit.clone(), dyn_clock.clone()),
      view: ViewLoanUseCase::new(loans.clone(), audit.clone(), dyn_clock.clone()),
      list: ListLoansUseCase::new(loans.clone(), audit.clone(), dyn_clock.clone(), limits),
      update_status: UpdateLoanStatusUseCase::new(loans.clone(), audit.clone(), dyn_clock.clone()),
      delete: DeleteLoanUseCase::new(loans.clone(), audit.clone(), dyn_clock.clone()),
      view_logs: ViewAuditLogUseCase::new(audit.clone(), dyn_clock, limits),
      loans,
      audit,
      clock,
      cancel: CancellationToken::new(),
    }
  }

  async fn create_loan(&self, borrower: &Actor) -> Loan {
    let loan = self
      .create
      .execute(
        borrower,
        CreateLoanCommand {
          amount: dec!(5000),
          interest_rate: dec!(7.5),
          term_months: 24,
        },
        &self.cancel,
      )
      .await
      .unwrap()
      .loan;
    self.clock.advance(Duration::seconds(1));
    loan
  }

  async fn decide(
    &self,
    actor: &Actor,
    loan_id: LoanId,
    status: &str,
    reason: Option<&str>,
  ) -> Result<Loan, LoanError> {
    self
      .update_status
      .execute(
        actor,
        UpdateLoanStatusCommand {
          loan_id: loan_id.to_string(),
          status: status.to_string(),
          rejection_reason: reason.map(str::to_string),
        },
        &self.cancel,
      )
      .await
      .map(|r| r.loan)
  }

  async fn events(&self) -> Vec<AuditEvent> {
    self.audit.entries().await.iter().map(|e| e.event).collect()
  }
}

fn borrower() -> Actor {
  Actor::new(UserId::new().to_string(), Role::User)
}

fn admin() -> Actor {
  Actor::new(UserId::new().to_string(), Role::Admin)
}

#[tokio::test]
async fn test_create_and_view_own_loan() {
  let app = TestApp::new();
  let alice = borrower();

  let loan = app.create_loan(&alice).await;
  assert_eq!(loan.status, LoanStatus::Pending);
  assert_eq!(loan.user_id.to_string(), alice.user_id);
  assert_eq!(loan.amount, dec!(5000));

  let viewed = app
    .view
    .execute(
      &alice,
      ViewLoanCommand {
        loan_id: loan.id.to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap()
    .loan;
  assert_eq!(viewed, loan);

  let entries = app.audit.entries().await;
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].event, AuditEvent::CreateLoan);
  assert_eq!(entries[1].event, AuditEvent::ViewLoanStatus);
  assert!(entries.iter().all(|e| e.user_id.to_string() == alice.user_id));
}

#[tokio::test]
async fn test_view_foreign_or_unknown_loan_is_not_found() {
  let app = TestApp::new();
  let loan = app.create_loan(&borrower()).await;

  for loan_id in [loan.id.to_string(), LoanId::new().to_string()] {
    let err = app
      .view
      .execute(&borrower(), ViewLoanCommand { loan_id }, &app.cancel)
      .await
      .unwrap_err();
    assert!(matches!(err, LoanError::NotFound));
  }

  let err = app
    .view
    .execute(
      &borrower(),
      ViewLoanCommand {
        loan_id: "42".to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidLoanId);
}

#[tokio::test]
async fn test_invalid_terms_write_nothing() {
  let app = TestApp::new();

  let err = app
    .create
    .execute(
      &borrower(),
      CreateLoanCommand {
        amount: dec!(0),
        interest_rate: dec!(5),
        term_months: 12,
      },
      &app.cancel,
    )
    .await
    .unwrap_err();

  assert_eq!(err.kind(), ErrorKind::BadRequest);
  assert!(app.audit.entries().await.is_empty());
}

#[tokio::test]
async fn test_approve_then_terminal() {
  let app = TestApp::new();
  let boss = admin();
  let loan = app.create_loan(&borrower()).await;

  let approved = app.decide(&boss, loan.id, "approved", None).await.unwrap();
  assert_eq!(approved.status, LoanStatus::Approved);
  assert!(approved.approval_date.is_some());
  assert_eq!(approved.admin_id.map(|id| id.to_string()), Some(boss.user_id.clone()));

  let writes = app.audit.entries().await.len();
  let err = app
    .decide(&boss, loan.id, "rejected", Some("changed my mind"))
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::InvalidStatusTransition { .. }));
  assert_eq!(err.kind(), ErrorKind::BadRequest);
  assert_eq!(app.audit.entries().await.len(), writes);
}

#[tokio::test]
async fn test_reject_requires_reason() {
  let app = TestApp::new();
  let boss = admin();
  let loan = app.create_loan(&borrower()).await;

  for reason in [None, Some(""), Some("   ")] {
    let err = app.decide(&boss, loan.id, "rejected", reason).await.unwrap_err();
    assert!(matches!(err, LoanError::BadRequest(_)));
  }
  let err = app.decide(&boss, loan.id, "pending", None).await.unwrap_err();
  assert!(matches!(err, LoanError::BadRequest(_)));
  assert_eq!(app.events().await, vec![AuditEvent::CreateLoan]);

  let rejected = app
    .decide(&boss, loan.id, "rejected", Some("insufficient income"))
    .await
    .unwrap();
  assert_eq!(rejected.status, LoanStatus::Rejected);
  assert_eq!(rejected.rejection_reason.as_deref(), Some("insufficient income"));
  assert!(rejected.approval_date.is_none());
  assert_eq!(
    app.events().await,
    vec![AuditEvent::CreateLoan, AuditEvent::UpdateLoanStatus]
  );
}

#[tokio::test]
async fn test_update_unknown_loan_is_not_found() {
  let app = TestApp::new();
  let err = app
    .decide(&admin(), LoanId::new(), "approved", None)
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::NotFound));
}

#[tokio::test]
async fn test_admin_operations_reject_borrowers() {
  let app = TestApp::new();
  let alice = borrower();
  let loan = app.create_loan(&alice).await;

  let err = app.decide(&alice, loan.id, "approved", None).await.unwrap_err();
  assert!(matches!(err, LoanError::Forbidden));

  let err = app
    .list
    .execute(&alice, ListLoansCommand::default(), &app.cancel)
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::Forbidden));

  let err = app
    .delete
    .execute(
      &alice,
      DeleteLoanCommand {
        loan_id: loan.id.to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::Forbidden));

  let err = app
    .view_logs
    .execute(&alice, ViewAuditLogCommand::default(), &app.cancel)
    .await
    .unwrap_err();
  assert!(matches!(err, AuditError::Forbidden));

  assert_eq!(app.events().await, vec![AuditEvent::CreateLoan]);
}

#[tokio::test]
async fn test_list_loans_filters_and_paginates() {
  let app = TestApp::new();
  let boss = admin();
  let mut created = Vec::new();
  for _ in 0..3 {
    created.push(app.create_loan(&borrower()).await);
  }
  app.decide(&boss, created[0].id, "approved", None).await.unwrap();

  let page = app
    .list
    .execute(&boss, ListLoansCommand::default(), &app.cancel)
    .await
    .unwrap();
  assert_eq!(page.total, 3);
  assert_eq!(page.per_page, 2);
  assert_eq!(page.total_pages, 2);
  assert_eq!(page.current_page, 0);
  // Newest first by default
  assert_eq!(page.loans[0].id, created[2].id);

  let page = app
    .list
    .execute(
      &boss,
      ListLoansCommand {
        status: Some("pending".to_string()),
        order: Some("asc".to_string()),
        limit: Some(50),
        offset: Some(0),
      },
      &app.cancel,
    )
    .await
    .unwrap();
  assert_eq!(page.per_page, 5);
  assert_eq!(page.total, 2);
  assert_eq!(
    page.loans.iter().map(|l| l.id).collect::<Vec<_>>(),
    vec![created[1].id, created[2].id]
  );

  let page = app
    .list
    .execute(
      &boss,
      ListLoansCommand {
        status: Some("all".to_string()),
        offset: Some(2),
        ..Default::default()
      },
      &app.cancel,
    )
    .await
    .unwrap();
  assert_eq!(page.loans.len(), 1);
  assert_eq!(page.current_page, 2);

  let err = app
    .list
    .execute(
      &boss,
      ListLoansCommand {
        status: Some("archived".to_string()),
        ..Default::default()
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::BadRequest(_)));

  let views = app
    .events()
    .await
    .into_iter()
    .filter(|e| *e == AuditEvent::ViewAllLoans)
    .count();
  assert_eq!(views, 3);
}

#[tokio::test]
async fn test_delete_loan() {
  let app = TestApp::new();
  let boss = admin();
  let loan = app.create_loan(&borrower()).await;

  app
    .delete
    .execute(
      &boss,
      DeleteLoanCommand {
        loan_id: loan.id.to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap();
  assert!(app.loans.find_by_id(loan.id).await.unwrap().is_none());

  let err = app
    .delete
    .execute(
      &boss,
      DeleteLoanCommand {
        loan_id: loan.id.to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::NotFound));
}

#[tokio::test]
async fn test_audit_outage_fails_operation_after_commit() {
  let app = TestApp::new();
  let boss = admin();
  let loan = app.create_loan(&borrower()).await;

  app.audit.set_unavailable(true);
  let err = app
    .delete
    .execute(
      &boss,
      DeleteLoanCommand {
        loan_id: loan.id.to_string(),
      },
      &app.cancel,
    )
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    LoanError::OperationFailed {
      primary_committed: true
    }
  ));
  assert_eq!(err.kind(), ErrorKind::OperationFailed);
  // No compensation: the loan stays deleted
  assert!(app.loans.find_by_id(loan.id).await.unwrap().is_none());

  let err = app
    .create
    .execute(
      &borrower(),
      CreateLoanCommand {
        amount: dec!(100),
        interest_rate: dec!(1),
        term_months: 1,
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, LoanError::OperationFailed { .. }));
}

#[tokio::test]
async fn test_cancelled_request_writes_nothing() {
  let app = TestApp::new();
  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = app
    .create
    .execute(
      &borrower(),
      CreateLoanCommand {
        amount: dec!(100),
        interest_rate: dec!(1),
        term_months: 1,
      },
      &cancel,
    )
    .await
    .unwrap_err();

  assert!(matches!(err, LoanError::Cancelled));
  assert_eq!(err.kind().status_code(), 499);
  assert!(app.audit.entries().await.is_empty());
}

#[tokio::test]
async fn test_view_audit_log() {
  let app = TestApp::new();
  let boss = admin();
  let alice = borrower();
  let loan = app.create_loan(&alice).await;
  app.decide(&boss, loan.id, "approved", None).await.unwrap();

  let page = app
    .view_logs
    .execute(&boss, ViewAuditLogCommand::default(), &app.cancel)
    .await
    .unwrap();
  assert_eq!(page.total, 2);
  assert_eq!(page.logs[0].event, AuditEvent::UpdateLoanStatus);
  assert_eq!(page.logs[1].event, AuditEvent::CreateLoan);

  // The previous view is now visible, this one is not
  let page = app
    .view_logs
    .execute(
      &boss,
      ViewAuditLogCommand {
        event: Some("view_logs".to_string()),
        ..Default::default()
      },
      &app.cancel,
    )
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.logs[0].user_id.to_string(), boss.user_id);

  let err = app
    .view_logs
    .execute(
      &boss,
      ViewAuditLogCommand {
        event: Some("drop_table".to_string()),
        ..Default::default()
      },
      &app.cancel,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, AuditError::BadRequest(_)));

  assert_eq!(
    app
      .events()
      .await
      .into_iter()
      .filter(|e| *e == AuditEvent::ViewLogs)
      .count(),
    2
  );
}
