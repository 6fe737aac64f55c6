//! gRPC client for the auth service
//!
//! A single lazy `Channel` is shared by every handler and middleware clone;
//! HTTP/2 multiplexing handles concurrency, and the channel-level request
//! timeout bounds every call so no edge request can hang on the auth
//! service.

use crate::middleware::auth_gate::{AuthVerifier, Principal};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

// Proto module definitions from build.rs
pub mod proto {
    pub mod palisade {
        pub mod auth {
            tonic::include_proto!("palisade.auth");
        }
    }
}

use proto::palisade::auth::auth_service_client::AuthServiceClient;
use proto::palisade::auth::ValidateRequest;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(60);
const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct AuthClient {
    channel: Channel,
}

impl AuthClient {
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .context("Invalid auth service endpoint")?
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .http2_keep_alive_interval(KEEP_ALIVE_INTERVAL)
            .keep_alive_timeout(KEEP_ALIVE_TIMEOUT)
            .keep_alive_while_idle(true)
            .connect_lazy();

        Ok(Self { channel })
    }

    pub fn client(&self) -> AuthServiceClient<Channel> {
        AuthServiceClient::new(self.channel.clone())
    }
}

#[async_trait]
impl AuthVerifier for AuthClient {
    async fn validate(&self, token: &str) -> Result<Option<Principal>> {
        let response = self
            .client()
            .validate(tonic::Request::new(ValidateRequest {
                token: token.to_string(),
            }))
            .await
            .context("Validate call failed")?
            .into_inner();

        if !response.valid {
            return Ok(None);
        }

        let Some(user) = response.user else {
            return Ok(None);
        };

        Ok(Some(Principal {
            id: user.id,
            username: user.username,
            email: user.email,
        }))
    }
}
