//! Identity verification seam for connection admission.

use std::sync::Arc;

use async_trait::async_trait;

use pingboard_auth::jwt::JwtDecoder;
use pingboard_core::error::AppError;
use pingboard_core::types::UserId;

/// Validates a presented credential token and yields a stable identity.
///
/// The registry calls this exactly once per connection attempt. Any error
/// is treated uniformly as an authentication failure.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies the token, returning the authenticated identity.
    async fn verify(&self, token: &str) -> Result<UserId, AppError>;
}

/// JWT-backed identity verifier.
#[derive(Clone)]
pub struct TokenVerifier {
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier around a JWT decoder.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }
}

#[async_trait]
impl IdentityVerifier for TokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AppError> {
        if token.is_empty() {
            // A missing token is indistinguishable from an invalid one.
            return Err(AppError::authentication("No token provided"));
        }
        let claims = self.decoder.decode(token)?;
        Ok(claims.user_id())
    }
}
