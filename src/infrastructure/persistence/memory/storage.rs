//! In-memory storage engine.
//!
//! Transactions are fully serialized: `begin` takes the storage lock and
//! works on a private copy of the state, which `commit` writes back. A
//! handle dropped without commit releases the lock and its copy is lost.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::pvz::entities::{Product, Pvz, Reception};
use crate::domain::pvz::errors::{PvzError, RepositoryError};
use crate::domain::pvz::ports::{
  ProductRepository, PvzRepository, ReceptionRepository, Transaction, TransactionManager,
  TransactionMode,
};
use crate::domain::pvz::value_objects::ReceptionStatus;

/// Committed rows, in insertion order
#[derive(Debug, Clone, Default)]
pub struct StorageState {
  pub pvz: Vec<Pvz>,
  pub receptions: Vec<Reception>,
  pub products: Vec<Product>,
}

/// Storage operations that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
  PvzCreate,
  ReceptionCreate,
  ReceptionClose,
  /// The guarded close finds the reception already closed by someone else
  ConcurrentClose,
  ProductCreate,
  ProductDelete,
  ListReceptions,
  ListProducts,
  Commit,
}

#[derive(Debug, Default)]
struct Shared {
  state: StorageState,
  failures: HashSet<FailPoint>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
  shared: Arc<Mutex<Shared>>,
}

impl InMemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every later transaction fail at `point` until cleared
  pub async fn fail_at(&self, point: FailPoint) {
    self.shared.lock().await.failures.insert(point);
  }

  pub async fn clear_failures(&self) {
    self.shared.lock().await.failures.clear();
  }

  /// Copy of the committed state
  pub async fn snapshot(&self) -> StorageState {
    self.shared.lock().await.state.clone()
  }
}

#[async_trait]
impl TransactionManager for InMemoryStorage {
  async fn begin(&self, mode: TransactionMode) -> Result<Box<dyn Transaction>, PvzError> {
    let guard = self.shared.clone().lock_owned().await;
    let working = Working {
      state: guard.state.clone(),
      failures: guard.failures.clone(),
      read_only: mode == TransactionMode::ReadOnlySnapshot,
    };

    Ok(Box::new(InMemoryTransaction {
      guard: Some(guard),
      working,
    }))
  }
}

pub struct InMemoryTransaction {
  guard: Option<OwnedMutexGuard<Shared>>,
  working: Working,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
  fn pvz(&mut self) -> &mut dyn PvzRepository {
    &mut self.working
  }

  fn receptions(&mut self) -> &mut dyn ReceptionRepository {
    &mut self.working
  }

  fn products(&mut self) -> &mut dyn ProductRepository {
    &mut self.working
  }

  async fn commit(&mut self) -> Result<(), PvzError> {
    let mut guard = self
      .guard
      .take()
      .ok_or_else(|| RepositoryError::TransactionFailed("transaction already finished".to_string()))?;

    if self.working.failures.contains(&FailPoint::Commit) {
      return Err(RepositoryError::TransactionFailed("injected commit failure".to_string()).into());
    }

    if !self.working.read_only {
      guard.state = std::mem::take(&mut self.working.state);
    }
    Ok(())
  }

  async fn rollback(&mut self) -> Result<(), PvzError> {
    self.guard = None;
    Ok(())
  }
}

/// Private copy of the state a transaction reads and writes
struct Working {
  state: StorageState,
  failures: HashSet<FailPoint>,
  read_only: bool,
}

impl Working {
  fn check(&self, point: FailPoint) -> Result<(), PvzError> {
    if self.failures.contains(&point) {
      return Err(RepositoryError::QueryFailed(format!("injected failure at {point:?}")).into());
    }
    Ok(())
  }

  fn check_write(&self, point: FailPoint) -> Result<(), PvzError> {
    if self.read_only {
      return Err(
        RepositoryError::DatabaseError("cannot write in a read-only transaction".to_string()).into(),
      );
    }
    self.check(point)
  }
}

#[async_trait]
impl PvzRepository for Working {
  async fn create(&mut self, pvz: &Pvz) -> Result<(), PvzError> {
    self.check_write(FailPoint::PvzCreate)?;
    if self.state.pvz.iter().any(|p| p.id == pvz.id) {
      return Err(RepositoryError::DuplicateKey(format!("pvz {}", pvz.id)).into());
    }
    self.state.pvz.push(pvz.clone());
    Ok(())
  }

  async fn exists(&mut self, id: Uuid) -> Result<bool, PvzError> {
    Ok(self.state.pvz.iter().any(|p| p.id == id))
  }

  async fn list_all(&mut self) -> Result<Vec<Pvz>, PvzError> {
    let mut all = self.state.pvz.clone();
    all.sort_by(|a, b| b.registration_date.cmp(&a.registration_date));
    Ok(all)
  }
}

#[async_trait]
impl ReceptionRepository for Working {
  async fn create(&mut self, reception: &Reception) -> Result<(), PvzError> {
    self.check_write(FailPoint::ReceptionCreate)?;
    if !self.state.pvz.iter().any(|p| p.id == reception.pvz_id) {
      return Err(
        RepositoryError::DatabaseError(format!("pvz {} does not exist", reception.pvz_id)).into(),
      );
    }
    if reception.is_open()
      && self
        .state
        .receptions
        .iter()
        .any(|r| r.pvz_id == reception.pvz_id && r.is_open())
    {
      return Err(PvzError::ReceptionAlreadyOpen(reception.pvz_id));
    }
    self.state.receptions.push(reception.clone());
    Ok(())
  }

  async fn has_open(&mut self, pvz_id: Uuid) -> Result<bool, PvzError> {
    Ok(
      self
        .state
        .receptions
        .iter()
        .any(|r| r.pvz_id == pvz_id && r.is_open()),
    )
  }

  async fn find_open(&mut self, pvz_id: Uuid) -> Result<Option<Reception>, PvzError> {
    Ok(
      self
        .state
        .receptions
        .iter()
        .find(|r| r.pvz_id == pvz_id && r.is_open())
        .cloned(),
    )
  }

  async fn close_by_id(
    &mut self,
    reception_id: Uuid,
    closed_at: DateTime<Utc>,
  ) -> Result<u64, PvzError> {
    self.check_write(FailPoint::ReceptionClose)?;
    if self.failures.contains(&FailPoint::ConcurrentClose) {
      return Ok(0);
    }

    let Some(reception) = self
      .state
      .receptions
      .iter_mut()
      .find(|r| r.id == reception_id && r.is_open())
    else {
      return Ok(0);
    };

    reception.status = ReceptionStatus::Closed;
    reception.closed_at = Some(closed_at);
    Ok(1)
  }

  async fn list_by_pvz_ids(&mut self, pvz_ids: &[Uuid]) -> Result<Vec<Reception>, PvzError> {
    self.check(FailPoint::ListReceptions)?;
    let mut found: Vec<Reception> = self
      .state
      .receptions
      .iter()
      .filter(|r| pvz_ids.contains(&r.pvz_id))
      .cloned()
      .collect();
    found.sort_by_key(|r| r.date_time);
    Ok(found)
  }
}

#[async_trait]
impl ProductRepository for Working {
  async fn create(&mut self, product: &Product) -> Result<(), PvzError> {
    self.check_write(FailPoint::ProductCreate)?;
    if !self.state.receptions.iter().any(|r| r.id == product.reception_id) {
      return Err(
        RepositoryError::DatabaseError(format!(
          "reception {} does not exist",
          product.reception_id
        ))
        .into(),
      );
    }
    self.state.products.push(product.clone());
    Ok(())
  }

  async fn delete_last(&mut self, reception_id: Uuid) -> Result<Option<Uuid>, PvzError> {
    self.check_write(FailPoint::ProductDelete)?;

    // Same timestamp: the later insert is the last one
    let last = self
      .state
      .products
      .iter()
      .enumerate()
      .filter(|(_, p)| p.reception_id == reception_id)
      .max_by_key(|(index, p)| (p.date_time, *index))
      .map(|(index, _)| index);

    Ok(last.map(|index| self.state.products.remove(index).id))
  }

  async fn list_by_reception_ids(
    &mut self,
    reception_ids: &[Uuid],
  ) -> Result<Vec<Product>, PvzError> {
    self.check(FailPoint::ListProducts)?;
    let mut found: Vec<Product> = self
      .state
      .products
      .iter()
      .filter(|p| reception_ids.contains(&p.reception_id))
      .cloned()
      .collect();
    found.sort_by_key(|p| p.date_time);
    Ok(found)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::pvz::value_objects::{City, ProductType};

  #[tokio::test]
  async fn test_uncommitted_changes_are_invisible() {
    let storage = InMemoryStorage::new();
    let mut tx = storage.begin(TransactionMode::ReadWrite).await.unwrap();
    tx.pvz().create(&Pvz::new(City::Moscow)).await.unwrap();
    drop(tx);

    assert!(storage.snapshot().await.pvz.is_empty());
  }

  #[tokio::test]
  async fn test_read_only_transaction_rejects_writes() {
    let storage = InMemoryStorage::new();
    let mut tx = storage.begin(TransactionMode::ReadOnlySnapshot).await.unwrap();

    let result = tx.pvz().create(&Pvz::new(City::Moscow)).await;

    assert!(matches!(result, Err(PvzError::Repository(_))));
  }

  #[tokio::test]
  async fn test_second_open_reception_violates_uniqueness() {
    let storage = InMemoryStorage::new();
    let pvz = Pvz::new(City::Kazan);
    let mut tx = storage.begin(TransactionMode::ReadWrite).await.unwrap();
    tx.pvz().create(&pvz).await.unwrap();
    tx.receptions().create(&Reception::open(pvz.id)).await.unwrap();

    let result = tx.receptions().create(&Reception::open(pvz.id)).await;

    assert!(matches!(result, Err(PvzError::ReceptionAlreadyOpen(id)) if id == pvz.id));
  }

  #[tokio::test]
  async fn test_close_by_id_changes_one_row_once() {
    let storage = InMemoryStorage::new();
    let pvz = Pvz::new(City::Moscow);
    let reception = Reception::open(pvz.id);
    let mut tx = storage.begin(TransactionMode::ReadWrite).await.unwrap();
    tx.pvz().create(&pvz).await.unwrap();
    tx.receptions().create(&reception).await.unwrap();

    assert_eq!(tx.receptions().close_by_id(reception.id, Utc::now()).await.unwrap(), 1);
    assert_eq!(tx.receptions().close_by_id(reception.id, Utc::now()).await.unwrap(), 0);
    assert!(tx.receptions().find_open(pvz.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_delete_last_breaks_timestamp_ties_by_insertion() {
    let storage = InMemoryStorage::new();
    let pvz = Pvz::new(City::Moscow);
    let reception = Reception::open(pvz.id);
    let first = Product::new(reception.id, ProductType::Shoes);
    let mut second = Product::new(reception.id, ProductType::Clothing);
    second.date_time = first.date_time;

    let mut tx = storage.begin(TransactionMode::ReadWrite).await.unwrap();
    tx.pvz().create(&pvz).await.unwrap();
    tx.receptions().create(&reception).await.unwrap();
    tx.products().create(&first).await.unwrap();
    tx.products().create(&second).await.unwrap();

    assert_eq!(tx.products().delete_last(reception.id).await.unwrap(), Some(second.id));
    assert_eq!(tx.products().delete_last(reception.id).await.unwrap(), Some(first.id));
    assert_eq!(tx.products().delete_last(reception.id).await.unwrap(), None);
  }
}
