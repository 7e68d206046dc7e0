use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use super::transaction::PostgresTransaction;
use crate::domain::pvz::entities::Product;
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::ports::ProductRepository;
use crate::domain::pvz::value_objects::ProductType;

/// Database row structure for products table
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
  id: Uuid,
  date_time: DateTime<Utc>,
  product_type: String,
  reception_id: Uuid,
}

impl TryFrom<ProductRow> for Product {
  type Error = PvzError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    let product_type = ProductType::from_str(&row.product_type).map_err(|_| {
      PvzError::Internal(format!(
        "unknown product type in storage: {}",
        row.product_type
      ))
    })?;

    Ok(Product {
      id: row.id,
      date_time: row.date_time,
      product_type,
      reception_id: row.reception_id,
    })
  }
}

#[async_trait]
impl ProductRepository for PostgresTransaction {
  async fn create(&mut self, product: &Product) -> Result<(), PvzError> {
    sqlx::query(
      r#"
            INSERT INTO products (id, date_time, type, reception_id)
            VALUES ($1, $2, $3, $4)
            "#,
    )
    .bind(product.id)
    .bind(product.date_time)
    .bind(product.product_type.as_str())
    .bind(product.reception_id)
    .execute(self.connection()?)
    .await?;

    Ok(())
  }

  /// `seq` breaks timestamp ties in insertion order
  async fn delete_last(&mut self, reception_id: Uuid) -> Result<Option<Uuid>, PvzError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
      r#"
            DELETE FROM products
            WHERE id = (
                SELECT id
                FROM products
                WHERE reception_id = $1
                ORDER BY date_time DESC, seq DESC
                LIMIT 1
            )
            RETURNING id
            "#,
    )
    .bind(reception_id)
    .fetch_optional(self.connection()?)
    .await?;

    Ok(deleted)
  }

  async fn list_by_reception_ids(
    &mut self,
    reception_ids: &[Uuid],
  ) -> Result<Vec<Product>, PvzError> {
    let rows = sqlx::query_as::<_, ProductRow>(
      r#"
            SELECT id, date_time, type AS product_type, reception_id
            FROM products
            WHERE reception_id = ANY($1)
            ORDER BY date_time, seq
            "#,
    )
    .bind(reception_ids)
    .fetch_all(self.connection()?)
    .await?;

    rows.into_iter().map(Product::try_from).collect()
  }
}
