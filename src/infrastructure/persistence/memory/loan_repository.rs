use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::paginate;
use crate::domain::auth::value_objects::UserId;
use crate::domain::errors::RepositoryError;
use crate::domain::loan::{Loan, LoanId, LoanQuery, LoanRepository, StatusChange};
use crate::domain::pagination::{Page, SortOrder};

/// In-memory implementation of the LoanRepository trait
#[derive(Debug, Default)]
pub struct InMemoryLoanRepository {
  loans: RwLock<HashMap<LoanId, Loan>>,
}

impl InMemoryLoanRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
  async fn create(&self, loan: Loan) -> Result<Loan, RepositoryError> {
    let mut loans = self.loans.write().await;
    if loans.contains_key(&loan.id) {
      return Err(RepositoryError::DuplicateKey("id".to_string()));
    }
    loans.insert(loan.id, loan.clone());
    Ok(loan)
  }

  async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
    Ok(self.loans.read().await.get(&id).cloned())
  }

  async fn find_for_owner(&self, id: LoanId, owner: UserId) -> Result<Option<Loan>, RepositoryError> {
    let loans = self.loans.read().await;
    Ok(loans.get(&id).filter(|loan| loan.user_id == owner).cloned())
  }

  async fn list(&self, query: &LoanQuery) -> Result<Page<Loan>, RepositoryError> {
    let mut matching: Vec<Loan> = self
      .loans
      .read()
      .await
      .values()
      .filter(|loan| query.status.is_none_or(|status| loan.status == status))
      .cloned()
      .collect();

    // Ties on created_at fall back to the id so pages are stable
    matching.sort_by(|a, b| {
      a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.into_inner().cmp(&b.id.into_inner()))
    });
    if query.order == SortOrder::Desc {
      matching.reverse();
    }

    Ok(paginate(matching, &query.page))
  }

  async fn update_status(
    &self,
    id: LoanId,
    change: StatusChange,
    admin_id: UserId,
    now: DateTime<Utc>,
  ) -> Result<Loan, RepositoryError> {
    let mut loans = self.loans.write().await;

    let loan = loans.get_mut(&id).ok_or(RepositoryError::NotFound)?;
    loan
      .apply_status_change(change, admin_id, now)
      .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

    Ok(loan.clone())
  }

  async fn delete(&self, id: LoanId) -> Result<bool, RepositoryError> {
    Ok(self.loans.write().await.remove(&id).is_some())
  }
}
