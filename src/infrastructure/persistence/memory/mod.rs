//! Process-local stores backed by `tokio::sync::RwLock`
//!
//! Each store keeps every record behind one lock, so the conditional writes
//! (`activate`, `reset_password`, `update_status`) are atomic.

mod audit_log_repository;
mod loan_repository;
mod user_repository;

pub use audit_log_repository::InMemoryAuditLogRepository;
pub use loan_repository::InMemoryLoanRepository;
pub use user_repository::InMemoryUserRepository;

use crate::domain::pagination::{Page, PageRequest};

/// Cuts one page out of an already filtered and sorted listing
fn paginate<T>(items: Vec<T>, page: &PageRequest) -> Page<T> {
  let total = items.len() as u64;
  let items = items
    .into_iter()
    .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
    .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
    .collect();
  Page { items, total }
}
