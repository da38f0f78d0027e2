use chrono::{DateTime, Utc};

/// Source of "now" for every expiry decision in the domain
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}
