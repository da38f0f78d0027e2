use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::value_objects::UserId;

/// Per-user async mutexes serializing read-modify-write cycles on a user record
///
/// Shared by every service that loads a user, changes it and writes it back,
/// so a whole-record update cannot overwrite a concurrent change to sessions,
/// password or one-time tokens.
#[derive(Default)]
pub struct UserLocks {
  locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Waits for exclusive access to `user_id`; released when the guard drops
  pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
    let lock = self
      .locks
      .entry(user_id)
      .or_insert_with(|| Arc::new(Mutex::new(())))
      .clone();
    lock.lock_owned().await
  }

  /// Drops the lock entry of a deleted user
  pub fn forget(&self, user_id: UserId) {
    self.locks.remove(&user_id);
  }
}
