use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

use crate::domain::clock::Clock;

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Clock that only moves when told to; used to exercise token expiry
#[derive(Debug)]
pub struct ManualClock {
  now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self {
      now: RwLock::new(start),
    }
  }

  pub fn set(&self, now: DateTime<Utc>) {
    if let Ok(mut guard) = self.now.write() {
      *guard = now;
    }
  }

  pub fn advance(&self, by: Duration) {
    if let Ok(mut guard) = self.now.write() {
      *guard += by;
    }
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new(Utc::now())
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    match self.now.read() {
      Ok(guard) => *guard,
      Err(poisoned) => *poisoned.into_inner(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_manual_clock_advances() {
    let start = Utc::now();
    let clock = ManualClock::new(start);

    clock.advance(Duration::hours(25));
    assert_eq!(clock.now(), start + Duration::hours(25));

    clock.set(start);
    assert_eq!(clock.now(), start);
  }
}
