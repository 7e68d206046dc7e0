//! Capability sets exposed to the transport layer.
//!
//! Callers depend on the narrowest set they need rather than on the
//! concrete services.

use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{FullPvzInfo, Product, Pvz, Reception};
use super::errors::PvzError;
use super::value_objects::{DateRange, Pagination};

#[async_trait]
pub trait PvzOperations: Send + Sync {
  /// Registers a pickup point in one of the supported cities
  async fn create_pvz(&self, city: &str) -> Result<Pvz, PvzError>;

  /// Returns one page of pickup points with their receptions (filtered by
  /// date) and products
  async fn get_full_info(
    &self,
    range: DateRange,
    pagination: Pagination,
  ) -> Result<Vec<FullPvzInfo>, PvzError>;

  /// Returns every pickup point, newest first
  async fn get_all_pvz(&self) -> Result<Vec<Pvz>, PvzError>;
}

#[async_trait]
pub trait ReceptionOperations: Send + Sync {
  /// Opens a new reception at the pickup point
  async fn create_reception(&self, pvz_id: Uuid) -> Result<Reception, PvzError>;

  /// Closes the reception currently open at the pickup point
  async fn close_last_reception(&self, pvz_id: Uuid) -> Result<Reception, PvzError>;
}

#[async_trait]
pub trait ProductOperations: Send + Sync {
  /// Appends a product to the open reception of the pickup point
  async fn add_product(&self, pvz_id: Uuid, product_type: &str) -> Result<Product, PvzError>;

  /// Removes the most recently added product of the open reception
  async fn delete_last_product(&self, pvz_id: Uuid) -> Result<(), PvzError>;
}
