use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::{Email, PasswordHash, UserRole},
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  password_hash: String,
  role: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = AuthError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let corrupt = |field: &str| {
      AuthError::Repository(RepositoryError::DatabaseError(format!(
        "invalid {} stored for user {}",
        field, row.id
      )))
    };

    Ok(User::from_db(
      row.id,
      Email::new(row.email.as_str()).map_err(|_| corrupt("email"))?,
      PasswordHash::from_hash(row.password_hash.as_str()).map_err(|_| corrupt("password hash"))?,
      UserRole::from_str(&row.role).map_err(|_| corrupt("role"))?,
      row.created_at,
    ))
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: &User) -> Result<(), AuthError> {
    sqlx::query(
      r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
    )
    .bind(user.id)
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(user.role.as_str())
    .bind(user.created_at)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(User::try_from).transpose()
  }
}
