use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;
use super::value_objects::{Email, PasswordHash, UserRole};

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub email: Email,
  /// Argon2id hash, never the plain password
  pub password_hash: PasswordHash,
  pub role: UserRole,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn new(email: Email, password_hash: PasswordHash, role: UserRole) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      password_hash,
      role,
      created_at: Utc::now(),
    }
  }

  pub fn from_db(
    id: Uuid,
    email: Email,
    password_hash: PasswordHash,
    role: UserRole,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      role,
      created_at,
    }
  }
}

/// Identity extracted from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
  pub user_id: Uuid,
  pub role: UserRole,
}

impl Principal {
  pub fn new(user_id: Uuid, role: UserRole) -> Self {
    Self { user_id, role }
  }

  /// Fails with `Forbidden` unless the principal holds one of `allowed`
  pub fn require_any(&self, allowed: &[UserRole]) -> Result<(), AuthError> {
    if allowed.contains(&self.role) {
      Ok(())
    } else {
      Err(AuthError::Forbidden)
    }
  }
}
