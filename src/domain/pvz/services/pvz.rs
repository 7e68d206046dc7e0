use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::pvz::entities::{FullPvzInfo, Product, Pvz, Reception, ReceptionWithProducts};
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::operations::PvzOperations;
use crate::domain::pvz::ports::{DomainEvent, MetricsRecorder, TransactionMode};
use crate::domain::pvz::transaction::TransactionCoordinator;
use crate::domain::pvz::value_objects::{City, DateRange, Pagination};

/// PVZ registry and the nested aggregate reader
pub struct PvzService {
  transactions: TransactionCoordinator,
  metrics: Arc<dyn MetricsRecorder>,
}

impl PvzService {
  pub fn new(transactions: TransactionCoordinator, metrics: Arc<dyn MetricsRecorder>) -> Self {
    Self {
      transactions,
      metrics,
    }
  }

  /// Registers a new pickup point
  ///
  /// # Errors
  /// * `InvalidCity` if the city is not supported; nothing is persisted
  pub async fn create(&self, city: &str) -> Result<Pvz, PvzError> {
    let city = City::from_str(city).inspect_err(|_| {
      tracing::warn!(city, "rejected pvz with unsupported city");
    })?;

    let pvz = Pvz::new(city);
    let to_insert = pvz.clone();
    self
      .transactions
      .run(TransactionMode::ReadWrite, |tx| {
        Box::pin(async move { tx.pvz().create(&to_insert).await })
      })
      .await?;

    tracing::info!(pvz_id = %pvz.id, city = %pvz.city, "pvz created");
    self.metrics.record(DomainEvent::PvzCreated);
    Ok(pvz)
  }

  /// Reads one page of pickup points with nested receptions and products.
  ///
  /// Pagination applies to pickup points only. The date range filters
  /// receptions, so a pickup point can come back with no receptions.
  pub async fn full_info(
    &self,
    range: DateRange,
    pagination: Pagination,
  ) -> Result<Vec<FullPvzInfo>, PvzError> {
    let info = self
      .transactions
      .run(TransactionMode::ReadOnlySnapshot, |tx| {
        Box::pin(async move {
          let page = pagination.apply(tx.pvz().list_all().await?);
          if page.is_empty() {
            return Ok(Vec::new());
          }

          let pvz_ids: Vec<Uuid> = page.iter().map(|pvz| pvz.id).collect();
          let receptions: Vec<_> = tx
            .receptions()
            .list_by_pvz_ids(&pvz_ids)
            .await?
            .into_iter()
            .filter(|reception| range.contains(reception.date_time))
            .collect();

          let reception_ids: Vec<Uuid> = receptions.iter().map(|r| r.id).collect();
          let products = if reception_ids.is_empty() {
            Vec::new()
          } else {
            tx.products().list_by_reception_ids(&reception_ids).await?
          };

          Ok(assemble(page, receptions, products))
        })
      })
      .await?;

    tracing::debug!(
      page = pagination.page(),
      limit = pagination.limit(),
      returned = info.len(),
      "pvz full info read"
    );
    Ok(info)
  }

  /// Lists every pickup point, newest registration first
  pub async fn list_all(&self) -> Result<Vec<Pvz>, PvzError> {
    self
      .transactions
      .run(TransactionMode::ReadOnlySnapshot, |tx| {
        Box::pin(async move { tx.pvz().list_all().await })
      })
      .await
  }
}

/// Nests products under receptions and receptions under pickup points,
/// keeping fetch order at every level
fn assemble(
  page: Vec<Pvz>,
  receptions: Vec<Reception>,
  products: Vec<Product>,
) -> Vec<FullPvzInfo> {
  let mut products_by_reception: HashMap<Uuid, Vec<Product>> = HashMap::new();
  for product in products {
    products_by_reception
      .entry(product.reception_id)
      .or_default()
      .push(product);
  }

  let mut receptions_by_pvz: HashMap<Uuid, Vec<ReceptionWithProducts>> = HashMap::new();
  for reception in receptions {
    let products = products_by_reception
      .remove(&reception.id)
      .unwrap_or_default();
    receptions_by_pvz
      .entry(reception.pvz_id)
      .or_default()
      .push(ReceptionWithProducts {
        reception,
        products,
      });
  }

  page
    .into_iter()
    .map(|pvz| FullPvzInfo {
      receptions: receptions_by_pvz.remove(&pvz.id).unwrap_or_default(),
      pvz,
    })
    .collect()
}

#[async_trait]
impl PvzOperations for PvzService {
  async fn create_pvz(&self, city: &str) -> Result<Pvz, PvzError> {
    self.create(city).await
  }

  async fn get_full_info(
    &self,
    range: DateRange,
    pagination: Pagination,
  ) -> Result<Vec<FullPvzInfo>, PvzError> {
    self.full_info(range, pagination).await
  }

  async fn get_all_pvz(&self) -> Result<Vec<Pvz>, PvzError> {
    self.list_all().await
  }
}
