use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::{
  dtos::{CreateReceptionRequest, ReceptionResponse},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::domain::auth::UserRole;
use crate::domain::pvz::ReceptionOperations;

/// POST /receptions (employee)
pub async fn create_reception_handler(
  req: HttpRequest,
  request: web::Json<CreateReceptionRequest>,
  receptions: web::Data<Arc<dyn ReceptionOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(&[UserRole::Employee])?;

  let reception = receptions.create_reception(request.pvz_id).await?;

  Ok(HttpResponse::Created().json(ReceptionResponse::from(reception)))
}

/// POST /pvz/{pvzId}/close_last_reception (employee)
pub async fn close_last_reception_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  receptions: web::Data<Arc<dyn ReceptionOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(&[UserRole::Employee])?;

  let reception = receptions.close_last_reception(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(ReceptionResponse::from(reception)))
}
