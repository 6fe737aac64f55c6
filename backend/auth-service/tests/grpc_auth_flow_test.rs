// Integration tests for the auth-service gRPC API
//
// These tests exercise the full register / login / validate / logout flow
// against a running service and its backing stores.
//
// To run them with actual services:
//   docker-compose up -d postgres redis auth-service
//   cargo test --test grpc_auth_flow_test -- --nocapture
//   docker-compose down

use tonic::Request;

use auth_service::grpc::palisade::auth::auth_service_client::AuthServiceClient;
use auth_service::grpc::palisade::auth::{
    LoginRequest, LogoutRequest, RegisterRequest, ValidateRequest,
};

fn service_endpoint() -> String {
    std::env::var("AUTH_SERVICE_URL").unwrap_or_else(|_| "http://localhost:50051".to_string())
}

async fn connect() -> Option<AuthServiceClient<tonic::transport::Channel>> {
    match AuthServiceClient::connect(service_endpoint()).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping: auth-service not reachable ({})", e);
            eprintln!("Start it with: docker-compose up -d postgres redis auth-service");
            None
        }
    }
}

#[tokio::test]
async fn register_login_validate_logout_flow() {
    let Some(mut client) = connect().await else {
        return;
    };

    // Unique credentials per run so reruns do not collide
    let suffix = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let username = format!("alice_{}", suffix);
    let email = format!("alice_{}@example.com", suffix);

    // Register
    let registered = client
        .register(Request::new(RegisterRequest {
            username: username.clone(),
            email: email.clone(),
            password: "secret1".to_string(),
        }))
        .await
        .expect("registration should succeed")
        .into_inner();

    let user = registered.user.expect("registration returns the user");
    assert_eq!(user.username, username);
    assert!(!registered.token.is_empty());

    // Second registration with the same username is a duplicate
    let duplicate = client
        .register(Request::new(RegisterRequest {
            username: username.clone(),
            email: format!("other_{}@example.com", suffix),
            password: "secret2".to_string(),
        }))
        .await;
    assert_eq!(
        duplicate.expect_err("duplicate username must fail").code(),
        tonic::Code::AlreadyExists
    );

    // Wrong password is rejected
    let wrong = client
        .login(Request::new(LoginRequest {
            username: username.clone(),
            password: "wrongpass".to_string(),
        }))
        .await;
    assert_eq!(
        wrong.expect_err("wrong password must fail").code(),
        tonic::Code::Unauthenticated
    );

    // Correct password issues a token that validates to the same subject
    let login = client
        .login(Request::new(LoginRequest {
            username: username.clone(),
            password: "secret1".to_string(),
        }))
        .await
        .expect("login should succeed")
        .into_inner();

    let validated = client
        .validate(Request::new(ValidateRequest {
            token: login.token.clone(),
        }))
        .await
        .expect("validate call should succeed")
        .into_inner();

    assert!(validated.valid);
    let principal = validated.user.expect("valid token resolves a principal");
    assert_eq!(principal.id, user.id);
    assert_eq!(principal.username, username);
    assert_eq!(principal.email, email);

    // Logout revokes the token; validation then reports it invalid
    let logout = client
        .logout(Request::new(LogoutRequest {
            token: login.token.clone(),
        }))
        .await
        .expect("logout should succeed")
        .into_inner();
    assert!(logout.success);

    let after_logout = client
        .validate(Request::new(ValidateRequest {
            token: login.token.clone(),
        }))
        .await
        .expect("validate call should succeed")
        .into_inner();
    assert!(!after_logout.valid);
    assert!(after_logout.user.is_none());
}

#[tokio::test]
async fn validate_rejects_garbage_without_erroring() {
    let Some(mut client) = connect().await else {
        return;
    };

    let response = client
        .validate(Request::new(ValidateRequest {
            token: "not-a-token".to_string(),
        }))
        .await
        .expect("validate never errors for a bad token")
        .into_inner();

    assert!(!response.valid);
    assert!(response.user.is_none());
}
