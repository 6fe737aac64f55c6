/// Authentication API endpoints
///
/// POST /auth/register - Register a new user
/// POST /auth/login - Authenticate and obtain a session token
/// POST /auth/logout - Revoke the presented session token
use actix_web::{web, HttpRequest, HttpResponse, Result};
use tracing::{error, info};

use super::models::{
    AuthResponse, ErrorResponse, LoginRequest, LogoutResponse, RegisterRequest, UserProfile,
};
use crate::clients::proto::palisade::auth::{
    AuthResponse as GrpcAuthResponse, LoginRequest as GrpcLoginRequest,
    LogoutRequest as GrpcLogoutRequest, RegisterRequest as GrpcRegisterRequest,
};
use crate::clients::AuthClient;

pub async fn register(
    req: web::Json<RegisterRequest>,
    auth: web::Data<AuthClient>,
) -> Result<HttpResponse> {
    info!(username = %req.username, "POST /auth/register");

    let request = tonic::Request::new(GrpcRegisterRequest {
        username: req.username.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
    });

    match auth.client().register(request).await {
        Ok(response) => Ok(auth_response(response.into_inner())),
        Err(status) => {
            error!(username = %req.username, error = %status, "Registration failed");
            Ok(map_auth_status(status))
        }
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    auth: web::Data<AuthClient>,
) -> Result<HttpResponse> {
    info!(username = %req.username, "POST /auth/login");

    let request = tonic::Request::new(GrpcLoginRequest {
        username: req.username.clone(),
        password: req.password.clone(),
    });

    match auth.client().login(request).await {
        Ok(response) => Ok(auth_response(response.into_inner())),
        Err(status) => {
            error!(username = %req.username, error = %status, "Login failed");
            Ok(map_auth_status(status))
        }
    }
}

/// Logout needs only the bearer header; the body is ignored
pub async fn logout(req: HttpRequest, auth: web::Data<AuthClient>) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(unauthorized());
    };

    let request = tonic::Request::new(GrpcLogoutRequest {
        token: token.to_string(),
    });

    match auth.client().logout(request).await {
        Ok(response) => {
            info!("Session token revoked");
            Ok(HttpResponse::Ok().json(LogoutResponse {
                success: response.into_inner().success,
            }))
        }
        Err(status) => {
            error!(error = %status, "Logout failed");
            match status.code() {
                tonic::Code::Unauthenticated => Ok(unauthorized()),
                _ => Ok(internal_error()),
            }
        }
    }
}

fn auth_response(resp: GrpcAuthResponse) -> HttpResponse {
    let user = resp.user.unwrap_or_default();
    HttpResponse::Ok().json(AuthResponse {
        token: resp.token,
        user: UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    })
}

fn map_auth_status(status: tonic::Status) -> HttpResponse {
    match status.code() {
        tonic::Code::AlreadyExists => HttpResponse::Conflict().json(ErrorResponse::with_message(
            "already_exists",
            status.message(),
        )),
        tonic::Code::Unauthenticated => unauthorized(),
        tonic::Code::InvalidArgument => HttpResponse::BadRequest().json(
            ErrorResponse::with_message("invalid_request", status.message()),
        ),
        _ => internal_error(),
    }
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::with_message("unauthorized", "unauthorized"))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::with_message(
        "internal_error",
        "internal server error",
    ))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
