/// API Gateway Main Entry Point
///
/// Serves the public auth endpoints and the protected routes. Protected
/// routes sit behind the authentication gate, which validates the bearer
/// token against the auth service on every request.
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use api_gateway::{clients::AuthClient, config::Config, middleware::AuthGate, rest_api};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "api_gateway=info,info".into()))
        .with_target(false)
        .json()
        .init();

    info!("Starting API Gateway");

    let config = Config::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let auth_client = AuthClient::new(
        &config.auth.endpoint,
        Duration::from_millis(config.auth.validate_timeout_ms),
    )
    .context("Failed to construct auth service client")?;
    info!(endpoint = %config.auth.endpoint, "Auth service client initialized");

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(auth_client.clone()))
            .route("/health", web::get().to(health))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(rest_api::auth::register))
                    .route("/login", web::post().to(rest_api::auth::login))
                    .route("/logout", web::post().to(rest_api::auth::logout)),
            )
            .service(
                web::scope("/api")
                    .wrap(AuthGate::new(Arc::new(auth_client.clone())))
                    .route("/me", web::get().to(rest_api::profile::me)),
            )
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
