/// gRPC server implementation for auth-service
///
/// Implements the RPCs from auth_service.proto:
/// - Register, Login: credential flows that mint fresh session tokens
/// - Validate: the two-layer token check used by the edge gateway
/// - Logout: revocation until the token's natural expiry
use crate::db;
use crate::error::AuthError;
use crate::models::User;
use crate::security::{hash_password, verify_password};
use crate::services::TokenService;
use sqlx::PgPool;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

// Import generated protobuf types
pub mod palisade {
    pub mod auth {
        tonic::include_proto!("palisade.auth");
    }
}

use palisade::auth::auth_service_server::AuthService;
use palisade::auth::{
    AuthResponse, LoginRequest, LogoutRequest, LogoutResponse, RegisterRequest, User as ProtoUser,
    ValidateRequest, ValidateResponse,
};

#[derive(Clone)]
pub struct AuthServer {
    db: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthServer {
    pub fn new(db: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { db, tokens }
    }
}

#[tonic::async_trait]
impl AuthService for AuthServer {
    /// Register a new user and issue their first session token
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> std::result::Result<Response<AuthResponse>, Status> {
        let req = request.into_inner();

        if db::users::find_by_username(&self.db, &req.username)
            .await
            .map_err(to_status)?
            .is_some()
        {
            return Err(AuthError::UsernameAlreadyExists.to_status());
        }

        if db::users::find_by_email(&self.db, &req.email)
            .await
            .map_err(to_status)?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyExists.to_status());
        }

        let password_hash = hash_password(&req.password).map_err(to_status)?;

        let user = db::users::create_user(&self.db, &req.username, &req.email, &password_hash)
            .await
            .map_err(to_status)?;

        let token = self.tokens.issue(user.subject_id()).map_err(to_status)?;

        info!(user_id = user.id, username = %user.username, "User registered");

        Ok(Response::new(AuthResponse {
            user: Some(proto_user(&user)),
            token,
        }))
    }

    /// Authenticate with username and password and issue a session token.
    ///
    /// Unknown user and wrong password collapse into the same error so the
    /// response does not reveal which part was wrong.
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<AuthResponse>, Status> {
        let req = request.into_inner();

        let user = db::users::find_by_username(&self.db, &req.username)
            .await
            .map_err(to_status)?
            .ok_or_else(|| AuthError::InvalidCredentials.to_status())?;

        if !verify_password(&req.password, &user.password_hash).map_err(to_status)? {
            warn!(username = %req.username, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials.to_status());
        }

        let token = self.tokens.issue(user.subject_id()).map_err(to_status)?;

        info!(user_id = user.id, "User logged in");

        Ok(Response::new(AuthResponse {
            user: Some(proto_user(&user)),
            token,
        }))
    }

    /// Check a session token and resolve its principal.
    ///
    /// An invalid token is an answer, not an error: every rejection comes
    /// back as `valid=false` with empty identity so callers branch once.
    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> std::result::Result<Response<ValidateResponse>, Status> {
        let req = request.into_inner();

        let claims = match self.tokens.validate(&req.token).await {
            Ok(claims) => claims,
            Err(err)
                if err.is_token_rejection() || matches!(err, AuthError::StoreUnavailable(_)) =>
            {
                debug!("Token rejected: {}", err);
                return Ok(Response::new(ValidateResponse {
                    valid: false,
                    user: None,
                }));
            }
            Err(err) => return Err(err.to_status()),
        };

        let user = match db::users::find_by_id(&self.db, claims.sub as i64)
            .await
            .map_err(to_status)?
        {
            Some(user) => user,
            None => {
                warn!(subject_id = claims.sub, "Valid token for unknown subject");
                return Ok(Response::new(ValidateResponse {
                    valid: false,
                    user: None,
                }));
            }
        };

        Ok(Response::new(ValidateResponse {
            valid: true,
            user: Some(proto_user(&user)),
        }))
    }

    /// Revoke the presented token until its natural expiry
    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> std::result::Result<Response<LogoutResponse>, Status> {
        let req = request.into_inner();

        self.tokens.revoke(&req.token).await.map_err(to_status)?;

        Ok(Response::new(LogoutResponse { success: true }))
    }
}

fn proto_user(user: &User) -> ProtoUser {
    ProtoUser {
        id: user.subject_id(),
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

fn to_status(err: AuthError) -> Status {
    err.to_status()
}
