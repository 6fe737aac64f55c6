use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Revocation store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for the failures a token can exhibit during validation, as
    /// opposed to infrastructure faults.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::SignatureInvalid
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
        )
    }

    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            AuthError::InvalidCredentials => {
                Status::new(Code::Unauthenticated, "Invalid credentials")
            }
            AuthError::EmailAlreadyExists => {
                Status::new(Code::AlreadyExists, "Email already exists")
            }
            AuthError::UsernameAlreadyExists => {
                Status::new(Code::AlreadyExists, "Username already exists")
            }
            // One message for every token rejection so callers cannot
            // distinguish an expired token from a forged one.
            AuthError::MalformedToken
            | AuthError::SignatureInvalid
            | AuthError::TokenExpired
            | AuthError::TokenRevoked => {
                Status::new(Code::Unauthenticated, "Invalid, expired, or revoked token")
            }
            AuthError::StoreUnavailable(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

// Conversions from external error types
impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        AuthError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        tracing::error!("Redis error: {}", err);
        AuthError::StoreUnavailable(err.to_string())
    }
}

// gRPC Status conversion
impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.to_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejections_share_one_status_message() {
        let expired = AuthError::TokenExpired.to_status();
        let forged = AuthError::SignatureInvalid.to_status();
        let revoked = AuthError::TokenRevoked.to_status();

        assert_eq!(expired.code(), Code::Unauthenticated);
        assert_eq!(expired.message(), forged.message());
        assert_eq!(expired.message(), revoked.message());
    }

    #[test]
    fn infrastructure_errors_do_not_leak_detail() {
        let status = AuthError::Database("password_hash column missing".into()).to_status();
        assert_eq!(status.code(), Code::Internal);
        assert!(!status.message().contains("password_hash"));
    }
}
