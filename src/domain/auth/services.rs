use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Principal, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{PasswordHasher, TokenIssuer, UserRepository};
use super::value_objects::{Email, Password, UserRole};

/// Identity operations used by the transport layer
#[async_trait]
pub trait Authorization: Send + Sync {
  /// Issues a token for a throwaway identity with the given role
  async fn dummy_login(&self, role: &str) -> Result<String, AuthError>;

  async fn register(&self, email: &str, password: &str, role: &str) -> Result<User, AuthError>;

  /// Checks credentials and issues a token
  async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

  /// Resolves a bearer token to the identity it was issued for
  fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Authentication service implementing core business logic
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
  password_min_length: usize,
}

impl AuthService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    password_min_length: usize,
  ) -> Self {
    Self {
      user_repo,
      password_hasher,
      token_issuer,
      password_min_length,
    }
  }
}

#[async_trait]
impl Authorization for AuthService {
  async fn dummy_login(&self, role: &str) -> Result<String, AuthError> {
    let role = UserRole::from_str(role)?;
    let principal = Principal::new(Uuid::new_v4(), role);

    tracing::debug!(user_id = %principal.user_id, %role, "dummy login");
    self.token_issuer.issue(&principal)
  }

  /// Registers a new account
  ///
  /// # Errors
  /// * `InvalidUserRole`, `Validation` for malformed input
  /// * `EmailAlreadyExists` if the email is taken, including when a
  ///   concurrent registration wins the unique constraint
  async fn register(&self, email: &str, password: &str, role: &str) -> Result<User, AuthError> {
    let role = UserRole::from_str(role)?;
    let email = Email::new(email)?;
    let password = Password::new(password, self.password_min_length)?;

    if self.user_repo.find_by_email(&email).await?.is_some() {
      tracing::info!(%email, "registration with taken email");
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let user = User::new(email, password_hash, role);

    match self.user_repo.create(&user).await {
      Ok(()) => {}
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::EmailAlreadyExists);
      }
      Err(e) => return Err(e),
    }

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(user)
  }

  async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
    // Malformed input is indistinguishable from wrong credentials
    let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
    let password = Password::new(password, 0)?;

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    if !self
      .password_hasher
      .verify(&password, &user.password_hash)
      .await?
    {
      tracing::info!(user_id = %user.id, "login with wrong password");
      return Err(AuthError::InvalidCredentials);
    }

    self.token_issuer.issue(&Principal::new(user.id, user.role))
  }

  fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
    self.token_issuer.verify(token)
  }
}
