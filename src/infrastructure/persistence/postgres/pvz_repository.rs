use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use super::transaction::PostgresTransaction;
use crate::domain::pvz::entities::Pvz;
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::ports::PvzRepository;
use crate::domain::pvz::value_objects::City;

/// Database row structure for pvz table
#[derive(Debug, sqlx::FromRow)]
struct PvzRow {
  id: Uuid,
  registration_date: DateTime<Utc>,
  city: String,
}

impl TryFrom<PvzRow> for Pvz {
  type Error = PvzError;

  fn try_from(row: PvzRow) -> Result<Self, Self::Error> {
    let city = City::from_str(&row.city)
      .map_err(|_| PvzError::Internal(format!("unknown city in storage: {}", row.city)))?;

    Ok(Pvz::from_db(row.id, row.registration_date, city))
  }
}

#[async_trait]
impl PvzRepository for PostgresTransaction {
  async fn create(&mut self, pvz: &Pvz) -> Result<(), PvzError> {
    sqlx::query(
      r#"
            INSERT INTO pvz (id, registration_date, city)
            VALUES ($1, $2, $3)
            "#,
    )
    .bind(pvz.id)
    .bind(pvz.registration_date)
    .bind(pvz.city.as_str())
    .execute(self.connection()?)
    .await?;

    Ok(())
  }

  async fn exists(&mut self, id: Uuid) -> Result<bool, PvzError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM pvz WHERE id = $1)")
      .bind(id)
      .fetch_one(self.connection()?)
      .await?;

    Ok(exists)
  }

  async fn list_all(&mut self) -> Result<Vec<Pvz>, PvzError> {
    let rows = sqlx::query_as::<_, PvzRow>(
      r#"
            SELECT id, registration_date, city
            FROM pvz
            ORDER BY registration_date DESC
            "#,
    )
    .fetch_all(self.connection()?)
    .await?;

    rows.into_iter().map(Pvz::try_from).collect()
  }
}
