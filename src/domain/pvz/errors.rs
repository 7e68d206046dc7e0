use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the pickup point, reception and product operations
#[derive(Debug, Error)]
pub enum PvzError {
  #[error("Invalid city: {0}")]
  InvalidCity(String),

  #[error("Invalid product type: {0}")]
  InvalidProductType(String),

  #[error("PVZ not found: {0}")]
  PvzNotFound(Uuid),

  #[error("Open reception already exists for PVZ {0}")]
  ReceptionAlreadyOpen(Uuid),

  #[error("No open reception for PVZ {0}")]
  NoOpenReception(Uuid),

  #[error("No active reception for PVZ {0}")]
  NoActiveReception(Uuid),

  #[error("Reception already closed: {0}")]
  ReceptionAlreadyClosed(Uuid),

  #[error("No products to delete in reception {0}")]
  NoProductsToDelete(Uuid),

  #[error("Storage error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Internal error: {0}")]
  Internal(String),
}

/// Storage failures, never downgraded to a domain rule violation
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for PvzError {
  fn from(error: sqlx::Error) -> Self {
    PvzError::Repository(RepositoryError::from(error))
  }
}
