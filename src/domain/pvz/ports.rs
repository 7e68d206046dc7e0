use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{Product, Pvz, Reception};
use super::errors::PvzError;

/// Pickup point persistence, bound to one open transaction
#[async_trait]
pub trait PvzRepository: Send {
  /// Persists a new pickup point
  async fn create(&mut self, pvz: &Pvz) -> Result<(), PvzError>;

  /// Checks whether a pickup point with the given id exists
  async fn exists(&mut self, id: Uuid) -> Result<bool, PvzError>;

  /// Lists every pickup point, newest registration first
  async fn list_all(&mut self) -> Result<Vec<Pvz>, PvzError>;
}

/// Reception persistence, bound to one open transaction
#[async_trait]
pub trait ReceptionRepository: Send {
  /// Persists a new reception.
  ///
  /// Fails with `ReceptionAlreadyOpen` when storage rejects a second open
  /// reception for the same pickup point.
  async fn create(&mut self, reception: &Reception) -> Result<(), PvzError>;

  /// Checks whether the pickup point has a reception in progress
  async fn has_open(&mut self, pvz_id: Uuid) -> Result<bool, PvzError>;

  /// Finds the reception in progress for the pickup point
  async fn find_open(&mut self, pvz_id: Uuid) -> Result<Option<Reception>, PvzError>;

  /// Closes the reception if it is still open, returning the number of rows
  /// changed. Zero means someone else already closed it.
  async fn close_by_id(
    &mut self,
    reception_id: Uuid,
    closed_at: DateTime<Utc>,
  ) -> Result<u64, PvzError>;

  /// Lists receptions owned by any of the given pickup points
  async fn list_by_pvz_ids(&mut self, pvz_ids: &[Uuid]) -> Result<Vec<Reception>, PvzError>;
}

/// Product persistence, bound to one open transaction
#[async_trait]
pub trait ProductRepository: Send {
  /// Persists a new product
  async fn create(&mut self, product: &Product) -> Result<(), PvzError>;

  /// Deletes the most recently created product of the reception and returns
  /// its id, or `None` when the reception has no products
  async fn delete_last(&mut self, reception_id: Uuid) -> Result<Option<Uuid>, PvzError>;

  /// Lists products owned by any of the given receptions
  async fn list_by_reception_ids(
    &mut self,
    reception_ids: &[Uuid],
  ) -> Result<Vec<Product>, PvzError>;
}

/// Isolation requested for a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
  /// Mutating use cases
  ReadWrite,
  /// Multi-table reads that must observe one consistent snapshot
  ReadOnlySnapshot,
}

/// An open atomic unit.
///
/// Dropping it without calling `commit` discards every change made through it.
#[async_trait]
pub trait Transaction: Send {
  fn pvz(&mut self) -> &mut dyn PvzRepository;

  fn receptions(&mut self) -> &mut dyn ReceptionRepository;

  fn products(&mut self) -> &mut dyn ProductRepository;

  /// Makes every change visible to later transactions
  async fn commit(&mut self) -> Result<(), PvzError>;

  /// Discards every change
  async fn rollback(&mut self) -> Result<(), PvzError>;
}

/// Opens atomic units against the storage engine
#[async_trait]
pub trait TransactionManager: Send + Sync {
  async fn begin(&self, mode: TransactionMode) -> Result<Box<dyn Transaction>, PvzError>;
}

/// Domain events handed to the observability collaborator after commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
  PvzCreated,
  ReceptionCreated,
  ReceptionClosed,
  ProductAdded,
  ProductRemoved,
}

/// Sink for domain events
pub trait MetricsRecorder: Send + Sync {
  fn record(&self, event: DomainEvent);
}

/// Recorder that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
  fn record(&self, _event: DomainEvent) {}
}
