use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::fan_out::{Operation, run_with_audit};
use crate::domain::audit::{AuditError, AuditEvent, AuditLogEntry, AuditLogRepository, AuditQuery};
use crate::domain::auth::value_objects::{Actor, UserId};
use crate::domain::clock::Clock;
use crate::domain::pagination::{PageLimits, PageRequest, SortOrder};

#[derive(Debug, Clone, Default)]
pub struct ViewAuditLogCommand {
  /// Event name to filter by; empty or absent lists every event
  pub event: Option<String>,
  pub order: Option<String>,
  pub limit: Option<u64>,
  pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ViewAuditLogResponse {
  pub logs: Vec<AuditLogEntry>,
  pub current_page: u64,
  pub per_page: u64,
  pub total: u64,
  pub total_pages: u64,
}

/// Use case for admins browsing the audit log
///
/// Viewing the log is itself recorded as `view_logs`, in parallel with the
/// query; the entry for this call is never part of the returned page.
pub struct ViewAuditLogUseCase {
  audit_repo: Arc<dyn AuditLogRepository>,
  clock: Arc<dyn Clock>,
  page_limits: PageLimits,
}

impl ViewAuditLogUseCase {
  pub fn new(
    audit_repo: Arc<dyn AuditLogRepository>,
    clock: Arc<dyn Clock>,
    page_limits: PageLimits,
  ) -> Self {
    Self {
      audit_repo,
      clock,
      page_limits,
    }
  }

  pub async fn execute(
    &self,
    actor: &Actor,
    command: ViewAuditLogCommand,
    cancel: &CancellationToken,
  ) -> Result<ViewAuditLogResponse, AuditError> {
    if !actor.is_admin() {
      return Err(AuditError::Forbidden);
    }
    let admin_id = UserId::parse(&actor.user_id).map_err(|_| AuditError::InvalidUserId)?;

    let event = match command.event.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(name) => Some(name.parse::<AuditEvent>()?),
    };
    let own_entry = AuditLogEntry::new(
      admin_id,
      AuditEvent::ViewLogs,
      format!("Logs viewed by Admin ID: {}", admin_id),
      self.clock.now(),
    );
    let page = PageRequest::new(command.limit, command.offset, self.page_limits);
    let query = AuditQuery {
      event,
      order: SortOrder::parse_lenient(command.order.as_deref()),
      page,
      exclude: Some(own_entry.id),
    };

    let repo = self.audit_repo.clone();
    let primary = Operation::new("list_audit_log", async move { repo.list(&query).await });
    let audit = Operation::audit(self.audit_repo.clone(), own_entry);

    let result = run_with_audit(cancel, primary, audit).await?;

    Ok(ViewAuditLogResponse {
      logs: result.items,
      current_page: page.offset,
      per_page: page.limit,
      total: result.total,
      total_pages: page.total_pages(result.total),
    })
  }
}
