use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pvz_service::{
  adapters::http::{RequestIdMiddleware, RequestMetricsMiddleware, configure_api},
  application::{ServiceDependencies, Services},
  infrastructure::{
    config::Config,
    metrics::PrometheusMetrics,
    persistence::postgres::{PostgresTransactionManager, PostgresUserRepository},
    security::{Argon2PasswordHasher, JwtTokenIssuer},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pvz_service=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting PVZ service");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  tracing::info!("Connecting to database");
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Failed to connect to database")?;
  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  let metrics = PrometheusMetrics::new().context("Failed to register metrics")?;

  let services = Services::new(ServiceDependencies {
    storage: Arc::new(PostgresTransactionManager::new(db_pool.clone())),
    users: Arc::new(PostgresUserRepository::new(db_pool)),
    password_hasher: Arc::new(
      Argon2PasswordHasher::new().context("Failed to initialise password hasher")?,
    ),
    token_issuer: Arc::new(JwtTokenIssuer::new(
      &config.security.jwt_secret,
      config.security.token_ttl_seconds,
    )),
    metrics: Arc::new(metrics.clone()),
    password_min_length: config.security.password_min_length,
  });

  let bind_address = (config.server.host.clone(), config.server.port);
  tracing::info!(
    host = %config.server.host,
    port = config.server.port,
    "Starting HTTP server"
  );

  HttpServer::new(move || {
    let services = services.clone();
    let metrics = metrics.clone();

    App::new()
      .wrap(RequestMetricsMiddleware::new(metrics.clone()))
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .configure(|cfg| configure_api(cfg, &services, metrics))
  })
  .bind(bind_address)?
  .run()
  .await?;

  Ok(())
}
