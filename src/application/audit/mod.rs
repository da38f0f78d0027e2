mod view_audit_log;

pub use view_audit_log::{ViewAuditLogCommand, ViewAuditLogResponse, ViewAuditLogUseCase};
