use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::pvz::entities::Reception;
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::operations::ReceptionOperations;
use crate::domain::pvz::ports::{DomainEvent, MetricsRecorder, TransactionMode};
use crate::domain::pvz::transaction::TransactionCoordinator;

/// Reception lifecycle: at most one open reception per pickup point,
/// `Open -> Closed` exactly once
pub struct ReceptionService {
  transactions: TransactionCoordinator,
  metrics: Arc<dyn MetricsRecorder>,
}

impl ReceptionService {
  pub fn new(transactions: TransactionCoordinator, metrics: Arc<dyn MetricsRecorder>) -> Self {
    Self {
      transactions,
      metrics,
    }
  }

  /// Opens a reception at the pickup point
  ///
  /// # Errors
  /// * `PvzNotFound` if the pickup point does not exist
  /// * `ReceptionAlreadyOpen` if it already has a reception in progress
  pub async fn create(&self, pvz_id: Uuid) -> Result<Reception, PvzError> {
    let reception = self
      .transactions
      .run(TransactionMode::ReadWrite, |tx| {
        Box::pin(async move {
          if !tx.pvz().exists(pvz_id).await? {
            tracing::warn!(%pvz_id, "pvz not found");
            return Err(PvzError::PvzNotFound(pvz_id));
          }

          if tx.receptions().has_open(pvz_id).await? {
            tracing::info!(%pvz_id, "reception already open");
            return Err(PvzError::ReceptionAlreadyOpen(pvz_id));
          }

          let reception = Reception::open(pvz_id);
          tx.receptions().create(&reception).await?;
          Ok(reception)
        })
      })
      .await?;

    tracing::info!(reception_id = %reception.id, %pvz_id, "reception created");
    self.metrics.record(DomainEvent::ReceptionCreated);
    Ok(reception)
  }

  /// Closes the reception in progress at the pickup point
  ///
  /// # Errors
  /// * `NoOpenReception` if nothing is open
  /// * `ReceptionAlreadyClosed` if a concurrent caller closed it first
  pub async fn close(&self, pvz_id: Uuid) -> Result<Reception, PvzError> {
    let reception = self
      .transactions
      .run(TransactionMode::ReadWrite, |tx| {
        Box::pin(async move {
          let mut reception = tx.receptions().find_open(pvz_id).await?.ok_or_else(|| {
            tracing::warn!(%pvz_id, "no open reception to close");
            PvzError::NoOpenReception(pvz_id)
          })?;

          let closed_at = Utc::now();
          let rows_affected = tx.receptions().close_by_id(reception.id, closed_at).await?;
          if rows_affected == 0 {
            tracing::warn!(reception_id = %reception.id, "reception already closed");
            return Err(PvzError::ReceptionAlreadyClosed(reception.id));
          }

          reception.close(closed_at)?;
          Ok(reception)
        })
      })
      .await?;

    tracing::info!(reception_id = %reception.id, %pvz_id, "reception closed");
    self.metrics.record(DomainEvent::ReceptionClosed);
    Ok(reception)
  }
}

#[async_trait]
impl ReceptionOperations for ReceptionService {
  async fn create_reception(&self, pvz_id: Uuid) -> Result<Reception, PvzError> {
    self.create(pvz_id).await
  }

  async fn close_last_reception(&self, pvz_id: Uuid) -> Result<Reception, PvzError> {
    self.close(pvz_id).await
  }
}
