/// Auth Service Main Entry Point
///
/// Starts the gRPC server with:
/// - PostgreSQL connection pool (user store)
/// - Redis connection manager (revocation store)
/// - Token lifecycle service with the configured secret and failure posture
use anyhow::{Context, Result};
use auth_service::{
    config::Settings,
    grpc::{palisade::auth::auth_service_server::AuthServiceServer, AuthServer},
    security::{RedisRevocationStore, TokenCodec},
    services::TokenService,
};
use redis_utils::RedisPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tonic::{metadata::MetadataValue, transport::Server, Request, Status};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "auth_service=info,info".into()))
        .with_target(false)
        .json()
        .init();

    info!("Starting Auth Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let db_pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout))
        .connect(&settings.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!(
        "Database pool initialized with {} max connections",
        settings.database.max_connections
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let redis_pool = RedisPool::connect(&settings.redis.url)
        .await
        .context("Failed to connect to Redis")?;
    info!("Redis connection manager initialized");

    if settings.revocation.fail_open {
        info!("Revocation checks fail open while the store is unreachable");
    } else {
        info!("Revocation checks fail closed while the store is unreachable");
    }

    let codec = TokenCodec::new(&settings.jwt.secret, settings.jwt.expiry_seconds);
    let revocation = Arc::new(RedisRevocationStore::new(
        redis_pool.manager(),
        settings.revocation.fail_open,
    ));
    let tokens = Arc::new(TokenService::new(codec, revocation));

    let auth_server = AuthServer::new(db_pool, tokens);

    let addr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("Starting gRPC server on {}", addr);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServiceServer<AuthServer>>()
        .await;

    Server::builder()
        .add_service(health_service)
        .add_service(AuthServiceServer::with_interceptor(
            auth_server,
            correlation_interceptor,
        ))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Auth service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}

/// Stamp requests with a correlation id when the caller did not send one
fn correlation_interceptor(mut req: Request<()>) -> Result<Request<()>, Status> {
    const CORRELATION_HEADER: &str = "x-correlation-id";

    if req.metadata().get(CORRELATION_HEADER).is_none() {
        let correlation_id = Uuid::new_v4().to_string();
        let value = MetadataValue::try_from(correlation_id.as_str())
            .map_err(|_| Status::internal("failed to set correlation id"))?;
        req.metadata_mut().insert(CORRELATION_HEADER, value);
    }

    Ok(req)
}
