use prometheus::{
  Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::domain::pvz::ports::{DomainEvent, MetricsRecorder};

/// Prometheus collectors for business events and HTTP traffic
#[derive(Clone)]
pub struct PrometheusMetrics {
  registry: Registry,
  created_pvz: IntCounter,
  created_receptions: IntCounter,
  closed_receptions: IntCounter,
  created_products: IntCounter,
  deleted_products: IntCounter,
  http_requests: IntCounterVec,
  http_duration: HistogramVec,
}

impl PrometheusMetrics {
  pub fn new() -> Result<Self, prometheus::Error> {
    let registry = Registry::new();

    let counter = |name: &str, help: &str| -> Result<IntCounter, prometheus::Error> {
      let counter = IntCounter::with_opts(Opts::new(name, help))?;
      registry.register(Box::new(counter.clone()))?;
      Ok(counter)
    };

    let created_pvz = counter("created_pvz_total", "Total number of created PVZ")?;
    let created_receptions = counter("created_receptions_total", "Total number of opened receptions")?;
    let closed_receptions = counter("closed_receptions_total", "Total number of closed receptions")?;
    let created_products = counter("created_products_total", "Total number of added products")?;
    let deleted_products = counter("deleted_products_total", "Total number of deleted products")?;

    let http_requests = IntCounterVec::new(
      Opts::new("http_requests_total", "Total number of HTTP requests"),
      &["method", "path", "status"],
    )?;
    registry.register(Box::new(http_requests.clone()))?;

    let http_duration = HistogramVec::new(
      HistogramOpts::new(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
      )
      .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
      &["method", "path"],
    )?;
    registry.register(Box::new(http_duration.clone()))?;

    Ok(Self {
      registry,
      created_pvz,
      created_receptions,
      closed_receptions,
      created_products,
      deleted_products,
      http_requests,
      http_duration,
    })
  }

  /// `path` should be the matched route pattern, not the raw URI
  pub fn observe_http(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
    self
      .http_requests
      .with_label_values(&[method, path, &status.to_string()])
      .inc();
    self
      .http_duration
      .with_label_values(&[method, path])
      .observe(elapsed.as_secs_f64());
  }

  /// Text exposition format
  pub fn render(&self) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
  }
}

impl MetricsRecorder for PrometheusMetrics {
  fn record(&self, event: DomainEvent) {
    let counter = match event {
      DomainEvent::PvzCreated => &self.created_pvz,
      DomainEvent::ReceptionCreated => &self.created_receptions,
      DomainEvent::ReceptionClosed => &self.closed_receptions,
      DomainEvent::ProductAdded => &self.created_products,
      DomainEvent::ProductRemoved => &self.deleted_products,
    };
    counter.inc();
  }
}
