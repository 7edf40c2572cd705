//! JWT claims structure used in access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pingboard_core::types::UserId;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the username acting as the stable user identifier.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// JWT ID, unique per issued token.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the authenticated user identity from the subject claim.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub.clone())
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
