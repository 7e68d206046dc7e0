use actix_web::{HttpResponse, http::header::ContentType, web};

use crate::adapters::http::{dtos::SuccessResponse, errors::ApiError};
use crate::infrastructure::metrics::PrometheusMetrics;

/// GET /health
pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(SuccessResponse {
    message: "ok".to_string(),
  })
}

/// GET /metrics, Prometheus text exposition format
pub async fn metrics_handler(
  metrics: web::Data<PrometheusMetrics>,
) -> Result<HttpResponse, ApiError> {
  let body = metrics
    .render()
    .map_err(|e| ApiError::Internal(format!("Failed to render metrics: {}", e)))?;

  Ok(
    HttpResponse::Ok()
      .content_type(ContentType::plaintext())
      .body(body),
  )
}
