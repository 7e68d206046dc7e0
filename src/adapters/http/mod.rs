pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::ErrorResponse;
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{
  AuthMiddleware, AuthUser, RequestId, RequestIdExt, RequestIdMiddleware, RequestMetricsMiddleware,
};
pub use routes::{
  configure_api, configure_auth_routes, configure_extractors, configure_pvz_routes,
  configure_system_routes,
};
