/// Session token lifecycle: issue, validate, revoke.
use crate::error::{AuthError, Result};
use crate::security::jwt::{Claims, TokenCodec};
use crate::security::token_revocation::RevocationStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Composes the token codec and the revocation store.
///
/// Validation consults the store before any cryptographic work, so a revoked
/// token is rejected without paying for a decode. No revocation decision is
/// cached here: the store is the single source of truth, and a revoke is
/// visible to every instance on their next check.
pub struct TokenService {
    codec: TokenCodec,
    revocation: Arc<dyn RevocationStore>,
}

impl TokenService {
    pub fn new(codec: TokenCodec, revocation: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocation }
    }

    /// Issue a fresh token for the subject. A fresh token cannot already be
    /// blacklisted, so no store round trip is needed.
    pub fn issue(&self, subject_id: u64) -> Result<String> {
        self.codec.issue(subject_id)
    }

    /// Validate a token: blacklist first, then signature and expiry.
    pub async fn validate(&self, token: &str) -> Result<Claims> {
        if self.revocation.is_revoked(token).await? {
            return Err(AuthError::TokenRevoked);
        }

        self.codec.decode(token)
    }

    /// Revoke a token until its natural expiry.
    ///
    /// The token must decode first: a token that fails structurally or
    /// cryptographically is rejected before it reaches the store, and the
    /// entry TTL comes from the token's own remaining lifetime.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let claims = self.codec.decode(token)?;

        let remaining = claims.exp - Utc::now().timestamp();
        self.revocation
            .record(token, Duration::from_secs(remaining.max(1) as u64))
            .await
    }
}
