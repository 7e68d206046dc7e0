use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreatePvzRequest, FullPvzResponse, PvzListQuery, PvzResponse},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::domain::auth::UserRole;
use crate::domain::pvz::PvzOperations;

const READERS: &[UserRole] = &[UserRole::Employee, UserRole::Moderator];

/// POST /pvz (moderator)
pub async fn create_pvz_handler(
  req: HttpRequest,
  request: web::Json<CreatePvzRequest>,
  pvz: web::Data<Arc<dyn PvzOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(&[UserRole::Moderator])?;
  request.validate()?;

  let created = pvz.create_pvz(&request.city).await?;

  Ok(HttpResponse::Created().json(PvzResponse::from(created)))
}

/// GET /pvz?startDate&endDate&page&limit (employee, moderator)
///
/// One page of pickup points with their receptions in the date window and
/// the products of those receptions.
pub async fn list_pvz_handler(
  req: HttpRequest,
  query: web::Query<PvzListQuery>,
  pvz: web::Data<Arc<dyn PvzOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(READERS)?;
  query.validate()?;

  let info = pvz
    .get_full_info(query.date_range(), query.pagination())
    .await?;

  let body: Vec<FullPvzResponse> = info.into_iter().map(Into::into).collect();
  Ok(HttpResponse::Ok().json(body))
}

/// GET /pvz/list (employee, moderator)
pub async fn list_all_pvz_handler(
  req: HttpRequest,
  pvz: web::Data<Arc<dyn PvzOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(READERS)?;

  let all = pvz.get_all_pvz().await?;

  let body: Vec<PvzResponse> = all.into_iter().map(Into::into).collect();
  Ok(HttpResponse::Ok().json(body))
}
