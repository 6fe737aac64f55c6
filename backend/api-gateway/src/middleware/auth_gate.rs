//! Edge authentication gate.
//!
//! Every protected request passes through here before any handler runs. The
//! gate extracts the bearer credential, makes one timeout-bounded remote
//! Validate call, and either attaches the resolved principal to the request
//! or rejects it. There are no retries; a failed or timed out validation is
//! terminal for that request. Every rejection, whatever its cause, produces
//! the same 401 so responses cannot be used to probe why a token was
//! refused.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Identity resolved from a validated session token
#[derive(Debug, Clone, serde::Serialize)]
pub struct Principal {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// Remote validation seam. The production implementation calls the auth
/// service over gRPC; tests substitute a stub.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// `Ok(None)` means the credential was rejected; `Err` means the
    /// validation call itself failed. The gate treats both as rejection.
    async fn validate(&self, token: &str) -> anyhow::Result<Option<Principal>>;
}

/// Authentication gate middleware
pub struct AuthGate {
    verifier: Arc<dyn AuthVerifier>,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn AuthVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    verifier: Arc<dyn AuthVerifier>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();

        Box::pin(async move {
            // A missing or malformed credential is rejected here, without
            // contacting the auth service.
            let token = match bearer_token(&req) {
                Some(token) => token.to_owned(),
                None => {
                    tracing::debug!(path = %req.path(), "Missing or malformed bearer credential");
                    return Err(unauthorized());
                }
            };

            match verifier.validate(&token).await {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                    service.call(req).await
                }
                Ok(None) => {
                    tracing::debug!(path = %req.path(), "Credential rejected by auth service");
                    Err(unauthorized())
                }
                Err(err) => {
                    // Fail closed: an unreachable or slow auth service
                    // rejects the request instead of waving it through.
                    tracing::warn!(path = %req.path(), error = %err, "Token validation call failed");
                    Err(unauthorized())
                }
            }
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> Error {
    actix_web::error::ErrorUnauthorized("unauthorized")
}

/// FromRequest implementation for Principal
impl actix_web::FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<Principal>() {
            Some(principal) => ready(Ok(principal.clone())),
            None => ready(Err(unauthorized())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubVerifier {
        outcome: fn() -> anyhow::Result<Option<Principal>>,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new(outcome: fn() -> anyhow::Result<Option<Principal>>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AuthVerifier for StubVerifier {
        async fn validate(&self, _token: &str) -> anyhow::Result<Option<Principal>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn accepted() -> anyhow::Result<Option<Principal>> {
        Ok(Some(Principal {
            id: 42,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
        }))
    }

    fn rejected() -> anyhow::Result<Option<Principal>> {
        Ok(None)
    }

    fn unreachable() -> anyhow::Result<Option<Principal>> {
        Err(anyhow::anyhow!("deadline exceeded"))
    }

    async fn me(principal: Principal) -> HttpResponse {
        HttpResponse::Ok().json(principal)
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler_with_principal() {
        let verifier = StubVerifier::new(accepted);
        let app = test::init_service(
            App::new()
                .wrap(AuthGate::new(verifier.clone()))
                .route("/me", web::get().to(me)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer some-token"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], 42);
        assert_eq!(body["username"], "alice");
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_missing_header_rejected_without_remote_call() {
        let verifier = StubVerifier::new(accepted);
        let app = test::init_service(
            App::new()
                .wrap(AuthGate::new(verifier.clone()))
                .route("/me", web::get().to(me)),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_rejected_without_remote_call() {
        let verifier = StubVerifier::new(accepted);
        let app = test::init_service(
            App::new()
                .wrap(AuthGate::new(verifier.clone()))
                .route("/me", web::get().to(me)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Basic YWxpY2U6c2VjcmV0"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_rejected_token_yields_401() {
        let verifier = StubVerifier::new(rejected);
        let app = test::init_service(
            App::new()
                .wrap(AuthGate::new(verifier.clone()))
                .route("/me", web::get().to(me)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer some-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_verifier_failure_fails_closed() {
        let verifier = StubVerifier::new(unreachable);
        let app = test::init_service(
            App::new()
                .wrap(AuthGate::new(verifier.clone()))
                .route("/me", web::get().to(me)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer some-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }
}
