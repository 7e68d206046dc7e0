use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use super::transaction::PostgresTransaction;
use crate::domain::pvz::entities::Reception;
use crate::domain::pvz::errors::PvzError;
use crate::domain::pvz::ports::ReceptionRepository;
use crate::domain::pvz::value_objects::ReceptionStatus;

const ONE_OPEN_PER_PVZ: &str = "receptions_one_open_per_pvz";

/// Database row structure for receptions table
#[derive(Debug, sqlx::FromRow)]
struct ReceptionRow {
  id: Uuid,
  date_time: DateTime<Utc>,
  pvz_id: Uuid,
  status: String,
  created_at: DateTime<Utc>,
  closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReceptionRow> for Reception {
  type Error = PvzError;

  fn try_from(row: ReceptionRow) -> Result<Self, Self::Error> {
    Ok(Reception {
      id: row.id,
      date_time: row.date_time,
      pvz_id: row.pvz_id,
      status: ReceptionStatus::from_str(&row.status)?,
      created_at: row.created_at,
      closed_at: row.closed_at,
    })
  }
}

#[async_trait]
impl ReceptionRepository for PostgresTransaction {
  async fn create(&mut self, reception: &Reception) -> Result<(), PvzError> {
    sqlx::query(
      r#"
            INSERT INTO receptions (id, date_time, pvz_id, status, created_at, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
    )
    .bind(reception.id)
    .bind(reception.date_time)
    .bind(reception.pvz_id)
    .bind(reception.status.as_str())
    .bind(reception.created_at)
    .bind(reception.closed_at)
    .execute(self.connection()?)
    .await
    .map_err(|e| match &e {
      sqlx::Error::Database(db_err) if db_err.constraint() == Some(ONE_OPEN_PER_PVZ) => {
        PvzError::ReceptionAlreadyOpen(reception.pvz_id)
      }
      _ => PvzError::from(e),
    })?;

    Ok(())
  }

  async fn has_open(&mut self, pvz_id: Uuid) -> Result<bool, PvzError> {
    let open = sqlx::query_scalar::<_, bool>(
      r#"
            SELECT EXISTS (
                SELECT 1 FROM receptions WHERE pvz_id = $1 AND status = 'in_progress'
            )
            "#,
    )
    .bind(pvz_id)
    .fetch_one(self.connection()?)
    .await?;

    Ok(open)
  }

  async fn find_open(&mut self, pvz_id: Uuid) -> Result<Option<Reception>, PvzError> {
    let row = sqlx::query_as::<_, ReceptionRow>(
      r#"
            SELECT id, date_time, pvz_id, status, created_at, closed_at
            FROM receptions
            WHERE pvz_id = $1 AND status = 'in_progress'
            "#,
    )
    .bind(pvz_id)
    .fetch_optional(self.connection()?)
    .await?;

    row.map(Reception::try_from).transpose()
  }

  async fn close_by_id(
    &mut self,
    reception_id: Uuid,
    closed_at: DateTime<Utc>,
  ) -> Result<u64, PvzError> {
    let result = sqlx::query(
      r#"
            UPDATE receptions
            SET status = 'close', closed_at = $2
            WHERE id = $1 AND status = 'in_progress'
            "#,
    )
    .bind(reception_id)
    .bind(closed_at)
    .execute(self.connection()?)
    .await?;

    Ok(result.rows_affected())
  }

  async fn list_by_pvz_ids(&mut self, pvz_ids: &[Uuid]) -> Result<Vec<Reception>, PvzError> {
    let rows = sqlx::query_as::<_, ReceptionRow>(
      r#"
            SELECT id, date_time, pvz_id, status, created_at, closed_at
            FROM receptions
            WHERE pvz_id = ANY($1)
            ORDER BY date_time
            "#,
    )
    .bind(pvz_ids)
    .fetch_all(self.connection()?)
    .await?;

    rows.into_iter().map(Reception::try_from).collect()
  }
}
