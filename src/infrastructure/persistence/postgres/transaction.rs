use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::domain::pvz::errors::{PvzError, RepositoryError};
use crate::domain::pvz::ports::{
  ProductRepository, PvzRepository, ReceptionRepository, Transaction, TransactionManager,
  TransactionMode,
};

/// Opens sqlx transactions on the pool.
///
/// `ReadWrite` keeps the server default (READ COMMITTED): a guarded UPDATE
/// re-reads a row changed by a concurrent commit. `ReadOnlySnapshot` runs at
/// REPEATABLE READ so the multi-table reads see one snapshot.
#[derive(Clone)]
pub struct PostgresTransactionManager {
  pool: PgPool,
}

impl PostgresTransactionManager {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
  async fn begin(&self, mode: TransactionMode) -> Result<Box<dyn Transaction>, PvzError> {
    let mut tx = self.pool.begin().await.map_err(|e| {
      tracing::error!(error = %e, "failed to begin transaction");
      RepositoryError::from(e)
    })?;

    if mode == TransactionMode::ReadOnlySnapshot {
      sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    }

    Ok(Box::new(PostgresTransaction { tx: Some(tx) }))
  }
}

/// One open sqlx transaction. Dropping it uncommitted rolls back.
pub struct PostgresTransaction {
  tx: Option<sqlx::Transaction<'static, Postgres>>,
}

impl PostgresTransaction {
  pub(super) fn connection(&mut self) -> Result<&mut PgConnection, PvzError> {
    self.tx.as_deref_mut().ok_or_else(|| {
      RepositoryError::TransactionFailed("transaction already finished".to_string()).into()
    })
  }

  fn finish(&mut self) -> Result<sqlx::Transaction<'static, Postgres>, PvzError> {
    self.tx.take().ok_or_else(|| {
      RepositoryError::TransactionFailed("transaction already finished".to_string()).into()
    })
  }
}

#[async_trait]
impl Transaction for PostgresTransaction {
  fn pvz(&mut self) -> &mut dyn PvzRepository {
    self
  }

  fn receptions(&mut self) -> &mut dyn ReceptionRepository {
    self
  }

  fn products(&mut self) -> &mut dyn ProductRepository {
    self
  }

  async fn commit(&mut self) -> Result<(), PvzError> {
    self
      .finish()?
      .commit()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()).into())
  }

  async fn rollback(&mut self) -> Result<(), PvzError> {
    self
      .finish()?
      .rollback()
      .await
      .map_err(|e| RepositoryError::TransactionFailed(e.to_string()).into())
  }
}
