use actix_web::{
  Error,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  time::Instant,
};

use crate::infrastructure::metrics::PrometheusMetrics;

const UNMATCHED_PATH: &str = "unmatched";

/// Records request count and latency per route pattern
///
/// The path label is the matched route pattern (`/pvz/{pvzId}/close_last_reception`)
/// so ids do not blow up label cardinality.
pub struct RequestMetricsMiddleware {
  metrics: PrometheusMetrics,
}

impl RequestMetricsMiddleware {
  pub fn new(metrics: PrometheusMetrics) -> Self {
    Self { metrics }
  }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetricsMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestMetricsMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestMetricsMiddlewareService {
      service: Rc::new(service),
      metrics: self.metrics.clone(),
    }))
  }
}

pub struct RequestMetricsMiddlewareService<S> {
  service: Rc<S>,
  metrics: PrometheusMetrics,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let metrics = self.metrics.clone();
    let method = req.method().to_string();
    let started = Instant::now();

    Box::pin(async move {
      let result = service.call(req).await;

      let (path, status) = match &result {
        Ok(res) => (
          res
            .request()
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_PATH.to_string()),
          res.status().as_u16(),
        ),
        Err(e) => (
          UNMATCHED_PATH.to_string(),
          e.as_response_error().status_code().as_u16(),
        ),
      };
      metrics.observe_http(&method, &path, status, started.elapsed());

      result
    })
  }
}
