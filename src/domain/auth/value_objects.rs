use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::ValidateEmail;

use super::errors::{AuthError, HashError, ValidationError};

// ============================================================================
// UserRole Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  Client,
  Employee,
  Moderator,
}

impl UserRole {
  pub const ALL: [UserRole; 3] = [UserRole::Client, UserRole::Employee, UserRole::Moderator];

  pub fn as_str(&self) -> &'static str {
    match self {
      UserRole::Client => "client",
      UserRole::Employee => "employee",
      UserRole::Moderator => "moderator",
    }
  }
}

impl FromStr for UserRole {
  type Err = AuthError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    UserRole::ALL
      .into_iter()
      .find(|role| role.as_str() == s)
      .ok_or_else(|| AuthError::InvalidUserRole(s.to_string()))
  }
}

impl fmt::Display for UserRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, AuthError> {
    let email = email.into();

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail.into());
    }

    // Normalize to lowercase
    Ok(Self(email.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone)]
pub struct Password(String);

impl Password {
  /// Creates a new Password of at least `min_length` characters
  pub fn new(password: impl Into<String>, min_length: usize) -> Result<Self, AuthError> {
    let password = password.into();

    if password.chars().count() < min_length {
      return Err(ValidationError::PasswordTooShort { min: min_length }.into());
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an existing PHC hash string after checking its format
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, AuthError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| HashError::InvalidFormat)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}
