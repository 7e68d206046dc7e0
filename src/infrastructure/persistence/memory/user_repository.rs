use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auth::{AuthError, Email, User, UserRepository};
use crate::domain::pvz::errors::RepositoryError;

/// Users keyed by normalized email
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
  users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: &User) -> Result<(), AuthError> {
    let mut users = self.users.write().await;
    if users.contains_key(user.email.as_str()) {
      return Err(RepositoryError::DuplicateKey(format!("users_email_unique: {}", user.email)).into());
    }
    users.insert(user.email.as_str().to_string(), user.clone());
    Ok(())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    Ok(self.users.read().await.get(email.as_str()).cloned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::{PasswordHash, UserRole};

  fn user(email: &str) -> User {
    User::new(
      Email::new(email).unwrap(),
      PasswordHash::from_hash("$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaGhhc2hoYXNoaGFzaA")
        .unwrap(),
      UserRole::Client,
    )
  }

  #[tokio::test]
  async fn test_duplicate_email_is_a_duplicate_key() {
    let repo = InMemoryUserRepository::new();
    repo.create(&user("a@example.com")).await.unwrap();

    let result = repo.create(&user("a@example.com")).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_find_by_email() {
    let repo = InMemoryUserRepository::new();
    let stored = user("b@example.com");
    repo.create(&stored).await.unwrap();

    let found = repo
      .find_by_email(&Email::new("b@example.com").unwrap())
      .await
      .unwrap();

    assert_eq!(found, Some(stored));
  }
}
