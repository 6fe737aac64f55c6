//! Configuration for the API gateway

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthServiceConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Ok(Config {
            server: ServerConfig::from_env()?,
            auth: AuthServiceConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Endpoint and timeout for the auth service. The timeout bounds the remote
/// Validate call every protected request makes; a request that outlives it
/// is rejected rather than left pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthServiceConfig {
    pub endpoint: String,
    pub validate_timeout_ms: u64,
}

impl AuthServiceConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:50051".to_string()),
            validate_timeout_ms: env::var("AUTH_VALIDATE_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid AUTH_VALIDATE_TIMEOUT_MS")?,
        })
    }
}
