use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{DummyLoginRequest, LoginRequest, RegisterRequest, TokenResponse, UserResponse},
  errors::ApiError,
};
use crate::domain::auth::Authorization;

/// Handler for issuing a token for a throwaway identity
///
/// POST /dummyLogin
/// Body: DummyLoginRequest (JSON)
/// Response: TokenResponse (JSON) with status 200
pub async fn dummy_login_handler(
  request: web::Json<DummyLoginRequest>,
  auth: web::Data<Arc<dyn Authorization>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let token = auth.dummy_login(&request.role).await?;

  Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Handler for user registration
///
/// POST /register
/// Body: RegisterRequest (JSON)
/// Response: UserResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  auth: web::Data<Arc<dyn Authorization>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let user = auth
    .register(&request.email, &request.password, &request.role)
    .await?;

  Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Handler for user login
///
/// POST /login
/// Body: LoginRequest (JSON)
/// Response: TokenResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  auth: web::Data<Arc<dyn Authorization>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let token = auth.login(&request.email, &request.password).await?;

  Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
