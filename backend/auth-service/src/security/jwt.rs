/// Session token encoding and decoding.
///
/// Tokens are HS256-signed JWTs carrying the subject id and an exact-second
/// validity window. Decoding depends only on the configured secret and the
/// evaluation time; it performs no I/O, so any instance holding the shared
/// secret can verify a token locally. Revocation is a separate concern and
/// lives in `token_revocation`.
use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The one signing algorithm this deployment accepts. The decoder pins it,
/// so a token whose header declares anything else is refused outright.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: u64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs and verifies session tokens with an injected secret and lifetime.
///
/// Construct one at startup and share it; the keys are immutable afterwards
/// and safe for concurrent use.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime_seconds: u64) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry is checked manually below with exact-second semantics; the
        // library default would allow 60 seconds of leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::seconds(lifetime_seconds as i64),
        }
    }

    /// Issue a signed token for the subject, valid from now for the
    /// configured lifetime.
    pub fn issue(&self, subject_id: u64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Decode and verify a token against the current time.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        self.decode_at(token, Utc::now())
    }

    /// Decode and verify at an explicit evaluation time.
    ///
    /// A token is expired from the exact second of `exp` onward and valid at
    /// any earlier second.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(classify)?;

        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName => AuthError::SignatureInvalid,
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::MalformedToken,
    }
}
