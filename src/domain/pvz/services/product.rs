use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::pvz::entities::Product;
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::operations::ProductOperations;
use crate::domain::pvz::ports::{DomainEvent, MetricsRecorder, TransactionMode};
use crate::domain::pvz::transaction::TransactionCoordinator;
use crate::domain::pvz::value_objects::ProductType;

/// Product ledger: products are appended to and removed from the open
/// reception only, last in first out
pub struct ProductService {
  transactions: TransactionCoordinator,
  metrics: Arc<dyn MetricsRecorder>,
}

impl ProductService {
  pub fn new(transactions: TransactionCoordinator, metrics: Arc<dyn MetricsRecorder>) -> Self {
    Self {
      transactions,
      metrics,
    }
  }

  /// Appends a product to the open reception of the pickup point
  ///
  /// # Errors
  /// * `InvalidProductType` for an unsupported category; nothing is persisted
  /// * `NoActiveReception` if the pickup point has no open reception
  pub async fn add(&self, pvz_id: Uuid, product_type: &str) -> Result<Product, PvzError> {
    let product_type = ProductType::from_str(product_type).inspect_err(|_| {
      tracing::warn!(%pvz_id, product_type, "rejected unsupported product type");
    })?;

    let product = self
      .transactions
      .run(TransactionMode::ReadWrite, |tx| {
        Box::pin(async move {
          let reception = tx
            .receptions()
            .find_open(pvz_id)
            .await?
            .ok_or(PvzError::NoActiveReception(pvz_id))?;

          let product = Product::new(reception.id, product_type);
          tx.products().create(&product).await?;
          Ok(product)
        })
      })
      .await
      .inspect_err(|e| {
        if matches!(e, PvzError::NoActiveReception(_)) {
          tracing::warn!(%pvz_id, "no active reception for product");
        }
      })?;

    tracing::info!(
      product_id = %product.id,
      reception_id = %product.reception_id,
      product_type = %product.product_type,
      "product added"
    );
    self.metrics.record(DomainEvent::ProductAdded);
    Ok(product)
  }

  /// Removes the most recently added product of the open reception
  ///
  /// # Errors
  /// * `NoOpenReception` if the pickup point has no open reception
  /// * `NoProductsToDelete` if the open reception is empty
  pub async fn remove_last(&self, pvz_id: Uuid) -> Result<(), PvzError> {
    let removed = self
      .transactions
      .run(TransactionMode::ReadWrite, |tx| {
        Box::pin(async move {
          let reception = tx
            .receptions()
            .find_open(pvz_id)
            .await?
            .ok_or(PvzError::NoOpenReception(pvz_id))?;

          tx.products()
            .delete_last(reception.id)
            .await?
            .ok_or(PvzError::NoProductsToDelete(reception.id))
        })
      })
      .await?;

    tracing::info!(product_id = %removed, %pvz_id, "last product deleted");
    self.metrics.record(DomainEvent::ProductRemoved);
    Ok(())
  }
}

#[async_trait]
impl ProductOperations for ProductService {
  async fn add_product(&self, pvz_id: Uuid, product_type: &str) -> Result<Product, PvzError> {
    self.add(pvz_id, product_type).await
  }

  async fn delete_last_product(&self, pvz_id: Uuid) -> Result<(), PvzError> {
    self.remove_last(pvz_id).await
  }
}
