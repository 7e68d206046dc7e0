use async_trait::async_trait;

use super::entities::{Principal, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Persists a new user. A taken email surfaces as `DuplicateKey`.
  async fn create(&self, user: &User) -> Result<(), AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;
}

/// Password hashing service trait
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Returns `Ok(false)` on mismatch; errors are reserved for unusable hashes
  async fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, AuthError>;
}

/// Signs and verifies bearer tokens
pub trait TokenIssuer: Send + Sync {
  fn issue(&self, principal: &Principal) -> Result<String, AuthError>;

  /// Fails with `InvalidToken` on a bad signature, malformed claims or expiry
  fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}
