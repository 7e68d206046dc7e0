use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::{Authorization, Principal, UserRole},
};

/// Bearer-token authentication middleware
///
/// Verifies the `Authorization: Bearer <token>` header and attaches the
/// resolved [`Principal`] to the request extensions. Requests without a valid
/// token are answered with 401 before reaching the handler. Role checks are
/// left to the handlers.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use pvz_service::domain::auth::Authorization;
/// # use pvz_service::adapters::http::middleware::AuthMiddleware;
///
/// # fn example(auth: Arc<dyn Authorization>) {
/// let app = App::new().service(
///   web::scope("")
///     .wrap(AuthMiddleware::new(auth))
///     .route("/protected", web::get().to(|| async { "Protected endpoint" })),
/// );
/// # }
/// ```
pub struct AuthMiddleware {
  auth: Arc<dyn Authorization>,
}

impl AuthMiddleware {
  pub fn new(auth: Arc<dyn Authorization>) -> Self {
    Self { auth }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      auth: self.auth.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  auth: Arc<dyn Authorization>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let auth = self.auth.clone();

    Box::pin(async move {
      let principal = match extract_bearer_token(&req)
        .and_then(|token| auth.authenticate(&token).map_err(ApiError::from))
      {
        Ok(principal) => principal,
        Err(e) => {
          tracing::debug!(path = %req.path(), "Rejected unauthenticated request");
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(principal);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to extract the authenticated principal from a request
pub trait AuthUser {
  /// Principal attached by [`AuthMiddleware`]; `InvalidToken` when the route
  /// is not behind the middleware
  fn principal(&self) -> Result<Principal, ApiError>;

  /// Principal holding one of `allowed` roles, otherwise 403
  fn require_role(&self, allowed: &[UserRole]) -> Result<Principal, ApiError> {
    let principal = self.principal()?;
    principal.require_any(allowed)?;
    Ok(principal)
  }
}

impl AuthUser for actix_web::HttpRequest {
  fn principal(&self) -> Result<Principal, ApiError> {
    self
      .extensions()
      .get::<Principal>()
      .copied()
      .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
  }
}
