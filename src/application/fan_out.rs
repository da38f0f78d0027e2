//! Runs a small fixed set of independent writes in parallel behind a join
//! barrier, reporting success only when every one of them succeeded.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::domain::audit::{AuditError, AuditLogEntry, AuditLogRepository};
use crate::domain::errors::RepositoryError;
use crate::domain::loan::LoanError;

/// One named unit of work for [`run_parallel`]
pub struct Operation<T> {
  name: &'static str,
  future: BoxFuture<'static, Result<T, RepositoryError>>,
}

impl<T> Operation<T> {
  pub fn new<F>(name: &'static str, future: F) -> Self
  where
    F: Future<Output = Result<T, RepositoryError>> + Send + 'static,
  {
    Self {
      name,
      future: Box::pin(future),
    }
  }
}

impl Operation<()> {
  /// Appends `entry` to the audit log
  pub fn audit(repo: Arc<dyn AuditLogRepository>, entry: AuditLogEntry) -> Self {
    Self::new("audit_log", async move { repo.append(entry).await })
  }
}

/// Error of one failed operation, kept for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
  pub operation: &'static str,
  pub error: String,
}

/// Aggregate failure of a fan-out
///
/// Callers only see a generic failure; the per-operation errors are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutFailure<T> {
  pub failures: Vec<OperationFailure>,
  /// Value of the first (primary) operation when it succeeded
  pub primary: Option<T>,
}

impl<T> FanOutFailure<T> {
  pub fn primary_committed(&self) -> bool {
    self.primary.is_some()
  }
}

impl<T> fmt::Display for FanOutFailure<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<&str> = self.failures.iter().map(|f| f.operation).collect();
    write!(f, "failed operations: {}", names.join(", "))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutError<T> {
  Failed(FanOutFailure<T>),
  Cancelled,
}

impl<T> From<FanOutError<T>> for LoanError {
  fn from(error: FanOutError<T>) -> Self {
    match error {
      FanOutError::Failed(failure) => LoanError::OperationFailed {
        primary_committed: failure.primary_committed(),
      },
      FanOutError::Cancelled => LoanError::Cancelled,
    }
  }
}

impl<T> From<FanOutError<T>> for AuditError {
  fn from(error: FanOutError<T>) -> Self {
    match error {
      FanOutError::Failed(failure) => AuditError::OperationFailed {
        primary_committed: failure.primary_committed(),
      },
      FanOutError::Cancelled => AuditError::Cancelled,
    }
  }
}

// Aborts still-running tasks when the coordinator returns early or is dropped
struct AbortOnDrop<T>(Vec<JoinHandle<T>>);

impl<T> Drop for AbortOnDrop<T> {
  fn drop(&mut self) {
    for handle in &self.0 {
      handle.abort();
    }
  }
}

/// Runs every operation on its own task and waits for all of them
///
/// Results are returned in input order. Any failure yields
/// `FanOutError::Failed` even if other operations already committed. The
/// first operation is treated as the primary write, and its value is kept in
/// the failure when it succeeded. Cancelling `cancel` aborts outstanding
/// tasks and yields `FanOutError::Cancelled`.
pub async fn run_parallel<T>(
  cancel: &CancellationToken,
  operations: Vec<Operation<T>>,
) -> Result<Vec<T>, FanOutError<T>>
where
  T: Send + 'static,
{
  if cancel.is_cancelled() {
    return Err(FanOutError::Cancelled);
  }

  let names: Vec<&'static str> = operations.iter().map(|op| op.name).collect();
  let mut tasks = AbortOnDrop(
    operations
      .into_iter()
      .map(|op| tokio::spawn(op.future))
      .collect::<Vec<_>>(),
  );
  let mut slots: Vec<Option<Result<T, String>>> = names.iter().map(|_| None).collect();

  let join_all = async {
    for (slot, handle) in slots.iter_mut().zip(tasks.0.iter_mut()) {
      *slot = Some(match handle.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("task did not complete: {}", e)),
      });
    }
  };

  let finished = tokio::select! {
    _ = cancel.cancelled() => false,
    _ = join_all => true,
  };

  if !finished {
    return Err(FanOutError::Cancelled);
  }

  let mut outcomes = Vec::with_capacity(slots.len());
  let mut failures = Vec::new();

  for (name, slot) in names.iter().copied().zip(slots) {
    match slot {
      Some(Ok(value)) => outcomes.push(Some(value)),
      Some(Err(error)) => {
        failures.push(OperationFailure {
          operation: name,
          error,
        });
        outcomes.push(None);
      }
      None => {
        failures.push(OperationFailure {
          operation: name,
          error: "no result recorded".to_string(),
        });
        outcomes.push(None);
      }
    }
  }

  if failures.is_empty() {
    return Ok(outcomes.into_iter().flatten().collect());
  }

  let primary = outcomes.into_iter().next().flatten();
  let primary_committed = primary.is_some();

  for failure in &failures {
    error!(
      operation = failure.operation,
      error = %failure.error,
      primary_committed,
      "Fan-out operation failed"
    );
  }

  Err(FanOutError::Failed(FanOutFailure { failures, primary }))
}

/// Runs a primary write and its audit write in parallel
///
/// Returns the primary's value only if both succeeded. A failed audit write
/// after a committed primary is still reported as a failure, with the
/// primary's value kept in [`FanOutFailure::primary`].
pub async fn run_with_audit<T>(
  cancel: &CancellationToken,
  primary: Operation<T>,
  audit: Operation<()>,
) -> Result<T, FanOutError<T>>
where
  T: Send + 'static,
{
  let primary_name = primary.name;
  let operations = vec![
    Operation {
      name: primary.name,
      future: primary.future.map(|r| r.map(Some)).boxed(),
    },
    Operation {
      name: audit.name,
      future: audit.future.map(|r| r.map(|_| None)).boxed(),
    },
  ];

  let values = run_parallel(cancel, operations)
    .await
    .map_err(|error| match error {
      FanOutError::Failed(failure) => FanOutError::Failed(FanOutFailure {
        failures: failure.failures,
        primary: failure.primary.flatten(),
      }),
      FanOutError::Cancelled => FanOutError::Cancelled,
    })?;

  match values.into_iter().next().flatten() {
    Some(value) => Ok(value),
    None => Err(FanOutError::Failed(FanOutFailure {
      failures: vec![OperationFailure {
        operation: primary_name,
        error: "primary produced no value".to_string(),
      }],
      primary: None,
    })),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::time::Duration;

  fn ok_after(ms: u64, value: u32) -> Operation<u32> {
    Operation::new("ok", async move {
      tokio::time::sleep(Duration::from_millis(ms)).await;
      Ok(value)
    })
  }

  fn failing(name: &'static str) -> Operation<u32> {
    Operation::new(name, async {
      Err(RepositoryError::Unavailable("audit store down".into()))
    })
  }

  #[tokio::test]
  async fn test_all_succeed_in_input_order() {
    let cancel = CancellationToken::new();
    let values = run_parallel(&cancel, vec![ok_after(30, 1), ok_after(1, 2)])
      .await
      .unwrap();
    assert_eq!(values, vec![1, 2]);
  }

  #[tokio::test]
  async fn test_operations_run_concurrently() {
    let cancel = CancellationToken::new();
    let started = std::time::Instant::now();
    run_parallel(&cancel, vec![ok_after(100, 1), ok_after(100, 2)])
      .await
      .unwrap();
    assert!(started.elapsed() < Duration::from_millis(190));
  }

  #[tokio::test]
  async fn test_secondary_failure_reports_committed_primary() {
    let cancel = CancellationToken::new();
    let result = run_parallel(&cancel, vec![ok_after(1, 1), failing("audit")]).await;

    match result {
      Err(FanOutError::Failed(failure)) => {
        assert_eq!(failure.primary, Some(1));
        assert!(failure.primary_committed());
        assert_eq!(failure.failures.len(), 1);
        assert_eq!(failure.failures[0].operation, "audit");
      }
      other => panic!("expected failure, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_primary_failure_waits_for_all() {
    let cancel = CancellationToken::new();
    let secondary_done = Arc::new(AtomicBool::new(false));
    let flag = secondary_done.clone();
    let secondary = Operation::new("audit", async move {
      tokio::time::sleep(Duration::from_millis(30)).await;
      flag.store(true, Ordering::SeqCst);
      Ok(0)
    });

    let result = run_parallel(&cancel, vec![failing("primary"), secondary]).await;

    assert!(matches!(
      result,
      Err(FanOutError::Failed(FanOutFailure { primary: None, .. }))
    ));
    assert!(secondary_done.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn test_cancellation_aborts_outstanding_tasks() {
    let cancel = CancellationToken::new();
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let slow = Operation::new("slow", async move {
      tokio::time::sleep(Duration::from_millis(200)).await;
      flag.store(true, Ordering::SeqCst);
      Ok(1)
    });

    let trigger = cancel.clone();
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(20)).await;
      trigger.cancel();
    });

    let result = run_parallel(&cancel, vec![slow]).await;
    assert_eq!(result, Err(FanOutError::Cancelled));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!finished.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn test_already_cancelled_spawns_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    let op = Operation::new("op", async move {
      flag.store(true, Ordering::SeqCst);
      Ok(1)
    });

    assert_eq!(run_parallel(&cancel, vec![op]).await, Err(FanOutError::Cancelled));
    tokio::task::yield_now().await;
    assert!(!ran.load(Ordering::SeqCst));
  }

  #[tokio::test]
  async fn test_run_with_audit_returns_primary_value() {
    let cancel = CancellationToken::new();
    let primary = Operation::new("find_loan", async { Ok("loan".to_string()) });
    let audit = Operation::new("audit", async { Ok(()) });

    let value = run_with_audit(&cancel, primary, audit).await.unwrap();
    assert_eq!(value, "loan");
  }

  #[tokio::test]
  async fn test_run_with_audit_keeps_committed_value_on_audit_failure() {
    let cancel = CancellationToken::new();
    let primary = Operation::new("delete_loan", async { Ok("loan".to_string()) });
    let audit = Operation::new("audit_log", async {
      Err(RepositoryError::Unavailable("audit store down".into()))
    });

    match run_with_audit(&cancel, primary, audit).await {
      Err(FanOutError::Failed(failure)) => {
        assert_eq!(failure.primary.as_deref(), Some("loan"));
        assert_eq!(failure.failures.len(), 1);
        assert_eq!(failure.failures[0].operation, "audit_log");
      }
      other => panic!("expected failure, got {:?}", other),
    }
  }

  #[test]
  fn test_fan_out_error_maps_to_generic_failure() {
    let err = LoanError::from(FanOutError::Failed(FanOutFailure {
      failures: vec![],
      primary: Some(7u32),
    }));
    assert!(matches!(
      err,
      LoanError::OperationFailed {
        primary_committed: true
      }
    ));
  }
}
