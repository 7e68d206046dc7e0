use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::entities::Principal;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenIssuer;
use crate::domain::auth::value_objects::UserRole;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  user_id: Uuid,
  role: UserRole,
  iat: i64,
  exp: i64,
}

/// HS256 bearer tokens signed with a shared secret
pub struct JwtTokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  ttl_seconds: i64,
}

impl JwtTokenIssuer {
  pub fn new(secret: &str, ttl_seconds: u64) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
    }
  }
}

impl TokenIssuer for JwtTokenIssuer {
  fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
      user_id: principal.user_id,
      role: principal.role,
      iat: now,
      exp: now.saturating_add(self.ttl_seconds),
    };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AuthError::TokenSigning(e.to_string()))
  }

  fn verify(&self, token: &str) -> Result<Principal, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
      .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AuthError::InvalidToken
      })?;

    Ok(Principal::new(data.claims.user_id, data.claims.role))
  }
}
