use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{Loan, LoanQuery};
use super::value_objects::{LoanId, StatusChange};
use crate::domain::auth::value_objects::UserId;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;

/// Repository trait for loan persistence operations
#[async_trait]
pub trait LoanRepository: Send + Sync {
  async fn create(&self, loan: Loan) -> Result<Loan, RepositoryError>;

  async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;

  /// Finds a loan only if it belongs to `owner`
  async fn find_for_owner(&self, id: LoanId, owner: UserId) -> Result<Option<Loan>, RepositoryError>;

  /// Returns one page of loans and the total matching the filter
  async fn list(&self, query: &LoanQuery) -> Result<Page<Loan>, RepositoryError>;

  /// Applies a status decision atomically against the stored loan
  ///
  /// Fails with `NotFound` for unknown loans and `Conflict` if the stored
  /// status no longer allows the change.
  async fn update_status(
    &self,
    id: LoanId,
    change: StatusChange,
    admin_id: UserId,
    now: DateTime<Utc>,
  ) -> Result<Loan, RepositoryError>;

  /// Removes a loan; returns whether it existed
  async fn delete(&self, id: LoanId) -> Result<bool, RepositoryError>;
}
