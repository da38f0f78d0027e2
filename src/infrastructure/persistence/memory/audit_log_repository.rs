use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::paginate;
use crate::domain::audit::{AuditLogEntry, AuditLogRepository, AuditQuery};
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::{Page, SortOrder};

/// Append-only in-memory audit log
///
/// Appends can be switched off with [`set_unavailable`](Self::set_unavailable)
/// to simulate an audit store outage.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
  entries: RwLock<Vec<AuditLogEntry>>,
  unavailable: AtomicBool,
}

impl InMemoryAuditLogRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_unavailable(&self, unavailable: bool) {
    self.unavailable.store(unavailable, Ordering::SeqCst);
  }

  /// Every entry in append order
  pub async fn entries(&self) -> Vec<AuditLogEntry> {
    self.entries.read().await.clone()
  }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
  async fn append(&self, entry: AuditLogEntry) -> Result<(), RepositoryError> {
    if self.unavailable.load(Ordering::SeqCst) {
      return Err(RepositoryError::Unavailable("audit log store offline".to_string()));
    }
    self.entries.write().await.push(entry);
    Ok(())
  }

  async fn list(&self, query: &AuditQuery) -> Result<Page<AuditLogEntry>, RepositoryError> {
    let mut matching: Vec<AuditLogEntry> = self
      .entries
      .read()
      .await
      .iter()
      .filter(|entry| query.event.is_none_or(|event| entry.event == event))
      .filter(|entry| query.exclude != Some(entry.id))
      .cloned()
      .collect();

    // Entries are stamped before their append is scheduled, so append order
    // can disagree with timestamps; the stable sort keeps append order on ties
    matching.sort_by_key(|entry| entry.timestamp);
    if query.order == SortOrder::Desc {
      matching.reverse();
    }

    Ok(paginate(matching, &query.page))
  }
}
