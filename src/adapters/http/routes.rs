use actix_web::{HttpRequest, error, web};
use std::sync::Arc;

use crate::application::Services;
use crate::infrastructure::metrics::PrometheusMetrics;

use super::errors::ApiError;
use super::handlers::{auth, products, pvz, receptions, system};
use super::middleware::AuthMiddleware;

/// Maps extractor failures (bad JSON, bad query, bad path id) to the JSON
/// error body instead of actix's plain-text default
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| extractor_error(err.to_string())),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| extractor_error(err.to_string())),
    )
    .app_data(
      web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| extractor_error(err.to_string())),
    );
}

fn extractor_error(message: String) -> error::Error {
  ApiError::Validation(message).into()
}

/// Configure the public identity routes
///
/// # Routes
///
/// - POST /dummyLogin - Token for a throwaway identity with the given role
/// - POST /register - Create an account
/// - POST /login - Exchange credentials for a token
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, services: &Services) {
  cfg
    .app_data(web::Data::new(services.auth.clone()))
    .route("/dummyLogin", web::post().to(auth::dummy_login_handler))
    .route("/register", web::post().to(auth::register_handler))
    .route("/login", web::post().to(auth::login_handler));
}

/// Configure health and metrics endpoints (public)
pub fn configure_system_routes(cfg: &mut web::ServiceConfig, metrics: PrometheusMetrics) {
  cfg
    .app_data(web::Data::new(metrics))
    .route("/health", web::get().to(system::health_handler))
    .route("/metrics", web::get().to(system::metrics_handler));
}

/// Configure the bearer-protected pickup point routes
///
/// Everything here sits behind [`AuthMiddleware`]; role checks happen in the
/// handlers.
///
/// # Routes
///
/// - POST /pvz - Register a pickup point (moderator)
/// - GET /pvz - Paged pickup points with receptions and products
/// - GET /pvz/list - All pickup points
/// - POST /pvz/{pvzId}/close_last_reception - Close the open reception (employee)
/// - POST /pvz/{pvzId}/delete_last_product - Remove the latest product (employee)
/// - POST /receptions - Open a reception (employee)
/// - POST /products - Add a product to the open reception (employee)
pub fn configure_pvz_routes(cfg: &mut web::ServiceConfig, services: &Services) {
  cfg.service(
    web::scope("")
      .wrap(AuthMiddleware::new(Arc::clone(&services.auth)))
      .app_data(web::Data::new(services.pvz.clone()))
      .app_data(web::Data::new(services.receptions.clone()))
      .app_data(web::Data::new(services.products.clone()))
      .service(
        web::resource("/pvz")
          .route(web::post().to(pvz::create_pvz_handler))
          .route(web::get().to(pvz::list_pvz_handler)),
      )
      .route("/pvz/list", web::get().to(pvz::list_all_pvz_handler))
      .route(
        "/pvz/{pvzId}/close_last_reception",
        web::post().to(receptions::close_last_reception_handler),
      )
      .route(
        "/pvz/{pvzId}/delete_last_product",
        web::post().to(products::delete_last_product_handler),
      )
      .route(
        "/receptions",
        web::post().to(receptions::create_reception_handler),
      )
      .route("/products", web::post().to(products::add_product_handler)),
  );
}

/// Mounts every route of the service
///
/// Public routes are registered before the protected scope, which matches
/// every remaining path.
pub fn configure_api(cfg: &mut web::ServiceConfig, services: &Services, metrics: PrometheusMetrics) {
  configure_extractors(cfg);
  configure_system_routes(cfg, metrics);
  configure_auth_routes(cfg, services);
  configure_pvz_routes(cfg, services);
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{App, http::StatusCode, test};
  use serde_json::{Value, json};
  use uuid::Uuid;

  use crate::adapters::http::dtos::{
    FullPvzResponse, ProductResponse, PvzResponse, ReceptionResponse, TokenResponse,
  };
  use crate::application::ServiceDependencies;
  use crate::infrastructure::persistence::memory::{InMemoryStorage, InMemoryUserRepository};
  use crate::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer};

  fn services(metrics: &PrometheusMetrics) -> Services {
    Services::new(ServiceDependencies {
      storage: Arc::new(InMemoryStorage::new()),
      users: Arc::new(InMemoryUserRepository::new()),
      password_hasher: Arc::new(Argon2PasswordHasher::new().unwrap()),
      token_issuer: Arc::new(JwtTokenIssuer::new("routes-test-secret", 3600)),
      metrics: Arc::new(metrics.clone()),
      password_min_length: 6,
    })
  }

  macro_rules! app {
    () => {{
      let metrics = PrometheusMetrics::new().unwrap();
      let services = services(&metrics);
      test::init_service(App::new().configure(|cfg| configure_api(cfg, &services, metrics))).await
    }};
  }

  macro_rules! token {
    ($app:expr, $role:expr) => {{
      let req = test::TestRequest::post()
        .uri("/dummyLogin")
        .set_json(json!({ "role": $role }))
        .to_request();
      let body: TokenResponse = test::call_and_read_body_json(&$app, req).await;
      format!("Bearer {}", body.token)
    }};
  }

  #[actix_web::test]
  async fn test_protected_routes_require_token() {
    let app = app!();

    let req = test::TestRequest::get().uri("/pvz/list").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_token");
  }

  #[actix_web::test]
  async fn test_public_routes_skip_authentication() {
    let app = app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
      .uri("/dummyLogin")
      .set_json(json!({ "role": "admin" }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );
  }

  #[actix_web::test]
  async fn test_register_then_login() {
    let app = app!();

    let req = test::TestRequest::post()
      .uri("/register")
      .set_json(json!({ "email": "Worker@Example.com", "password": "secret1", "role": "employee" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "worker@example.com");
    assert_eq!(body["role"], "employee");

    let req = test::TestRequest::post()
      .uri("/register")
      .set_json(json!({ "email": "worker@example.com", "password": "secret1", "role": "employee" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
      .uri("/login")
      .set_json(json!({ "email": "worker@example.com", "password": "wrong-one" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
      .uri("/login")
      .set_json(json!({ "email": "worker@example.com", "password": "secret1" }))
      .to_request();
    let body: TokenResponse = test::call_and_read_body_json(&app, req).await;
    assert!(!body.token.is_empty());
  }

  #[actix_web::test]
  async fn test_role_checks() {
    let app = app!();
    let employee = token!(app, "employee");
    let client = token!(app, "client");

    let req = test::TestRequest::post()
      .uri("/pvz")
      .insert_header(("Authorization", employee))
      .set_json(json!({ "city": "Москва" }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get()
      .uri("/pvz/list")
      .insert_header(("Authorization", client))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::FORBIDDEN
    );
  }

  #[actix_web::test]
  async fn test_reception_and_product_flow() {
    let app = app!();
    let moderator = token!(app, "moderator");
    let employee = token!(app, "employee");

    let req = test::TestRequest::post()
      .uri("/pvz")
      .insert_header(("Authorization", moderator.clone()))
      .set_json(json!({ "city": "Казань" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let pvz: PvzResponse = test::read_body_json(resp).await;
    assert_eq!(pvz.city, "Казань");

    // No reception yet
    let req = test::TestRequest::post()
      .uri("/products")
      .insert_header(("Authorization", employee.clone()))
      .set_json(json!({ "type": "обувь", "pvzId": pvz.id }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
      .uri("/receptions")
      .insert_header(("Authorization", employee.clone()))
      .set_json(json!({ "pvzId": pvz.id }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reception: ReceptionResponse = test::read_body_json(resp).await;
    assert_eq!(reception.status, "in_progress");

    let req = test::TestRequest::post()
      .uri("/receptions")
      .insert_header(("Authorization", employee.clone()))
      .set_json(json!({ "pvzId": pvz.id }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );

    for product_type in ["обувь", "электроника"] {
      let req = test::TestRequest::post()
        .uri("/products")
        .insert_header(("Authorization", employee.clone()))
        .set_json(json!({ "type": product_type, "pvzId": pvz.id }))
        .to_request();
      let resp = test::call_service(&app, req).await;
      assert_eq!(resp.status(), StatusCode::CREATED);
      let product: ProductResponse = test::read_body_json(resp).await;
      assert_eq!(product.reception_id, reception.id);
    }

    let req = test::TestRequest::post()
      .uri(&format!("/pvz/{}/delete_last_product", pvz.id))
      .insert_header(("Authorization", employee.clone()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
      .uri(&format!("/pvz/{}/close_last_reception", pvz.id))
      .insert_header(("Authorization", employee.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let closed: ReceptionResponse = test::read_body_json(resp).await;
    assert_eq!(closed.id, reception.id);
    assert_eq!(closed.status, "close");

    let req = test::TestRequest::get()
      .uri("/pvz?page=1&limit=10")
      .insert_header(("Authorization", employee))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing: Vec<FullPvzResponse> = test::read_body_json(resp).await;
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].receptions.len(), 1);
    assert_eq!(listing[0].receptions[0].products.len(), 1);
    assert_eq!(listing[0].receptions[0].products[0].product_type, "обувь");
  }

  #[actix_web::test]
  async fn test_unknown_pvz_and_bad_input() {
    let app = app!();
    let employee = token!(app, "employee");

    let req = test::TestRequest::post()
      .uri("/receptions")
      .insert_header(("Authorization", employee.clone()))
      .set_json(json!({ "pvzId": Uuid::new_v4() }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
      .uri("/pvz/not-a-uuid/close_last_reception")
      .insert_header(("Authorization", employee.clone()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");

    let req = test::TestRequest::get()
      .uri("/pvz?limit=31")
      .insert_header(("Authorization", employee.clone()))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
      .uri("/pvz?startDate=yesterday")
      .insert_header(("Authorization", employee))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::BAD_REQUEST
    );
  }

  #[actix_web::test]
  async fn test_metrics_endpoint_counts_business_events() {
    let app = app!();
    let moderator = token!(app, "moderator");

    let req = test::TestRequest::post()
      .uri("/pvz")
      .insert_header(("Authorization", moderator))
      .set_json(json!({ "city": "Москва" }))
      .to_request();
    assert_eq!(
      test::call_service(&app, req).await.status(),
      StatusCode::CREATED
    );

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains("created_pvz_total 1"));
  }
}
