use futures_util::future::BoxFuture;
use std::sync::Arc;

use super::errors::PvzError;
use super::ports::{Transaction, TransactionManager, TransactionMode};

/// Runs use cases as single atomic units.
///
/// A unit commits only when its work returns `Ok`. Any error, including a
/// domain rule violation, rolls the unit back and is returned unchanged.
/// If the caller drops the future mid-flight or the work panics, the
/// transaction handle is dropped uncommitted and storage discards it.
#[derive(Clone)]
pub struct TransactionCoordinator {
  manager: Arc<dyn TransactionManager>,
}

impl TransactionCoordinator {
  pub fn new(manager: Arc<dyn TransactionManager>) -> Self {
    Self { manager }
  }

  /// Runs `work` inside one transaction opened in `mode`
  ///
  /// # Example
  ///
  /// ```ignore
  /// let exists = coordinator
  ///   .run(TransactionMode::ReadWrite, |tx| {
  ///     Box::pin(async move { tx.pvz().exists(pvz_id).await })
  ///   })
  ///   .await?;
  /// ```
  pub async fn run<T, F>(&self, mode: TransactionMode, work: F) -> Result<T, PvzError>
  where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<T, PvzError>> + Send,
  {
    let mut tx = self.manager.begin(mode).await?;
    let outcome = work(tx.as_mut()).await;
    settle(tx, outcome).await
  }
}

/// Commits on success, rolls back on failure. A rollback failure is logged
/// and the original error still wins.
async fn settle<T>(mut tx: Box<dyn Transaction>, outcome: Result<T, PvzError>) -> Result<T, PvzError> {
  match outcome {
    Ok(value) => {
      tx.commit().await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to commit transaction");
      })?;
      Ok(value)
    }
    Err(error) => {
      if let Err(rollback_error) = tx.rollback().await {
        tracing::error!(error = %rollback_error, "failed to roll back transaction");
      }
      Err(error)
    }
  }
}
