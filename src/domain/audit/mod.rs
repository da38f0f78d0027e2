pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{AuditEvent, AuditLogEntry, AuditQuery};
pub use errors::AuditError;
pub use ports::AuditLogRepository;
