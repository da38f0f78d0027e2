use async_trait::async_trait;

use super::entities::{AuditLogEntry, AuditQuery};
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;

/// Append-only audit log sink
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
  async fn append(&self, entry: AuditLogEntry) -> Result<(), RepositoryError>;

  /// Returns one page of entries and the total matching the filter
  async fn list(&self, query: &AuditQuery) -> Result<Page<AuditLogEntry>, RepositoryError>;
}
