use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{AddProductRequest, ProductResponse, SuccessResponse},
  errors::ApiError,
  middleware::AuthUser,
};
use crate::domain::auth::UserRole;
use crate::domain::pvz::ProductOperations;

/// POST /products (employee)
pub async fn add_product_handler(
  req: HttpRequest,
  request: web::Json<AddProductRequest>,
  products: web::Data<Arc<dyn ProductOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(&[UserRole::Employee])?;
  request.validate()?;

  let product = products
    .add_product(request.pvz_id, &request.product_type)
    .await?;

  Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// POST /pvz/{pvzId}/delete_last_product (employee)
pub async fn delete_last_product_handler(
  req: HttpRequest,
  path: web::Path<Uuid>,
  products: web::Data<Arc<dyn ProductOperations>>,
) -> Result<HttpResponse, ApiError> {
  req.require_role(&[UserRole::Employee])?;

  products.delete_last_product(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Product deleted".to_string(),
  }))
}
