pub mod auth;
pub mod metrics;
pub mod request_id;

// Re-export middleware components for easier access
pub use auth::{AuthMiddleware, AuthUser};
pub use metrics::RequestMetricsMiddleware;
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
