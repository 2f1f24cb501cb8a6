use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// Field names follow RFC 7519 where one exists (`sub`, `iat`, `exp`).
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email address of the subject at issue time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `ttl` starting now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - User email address
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, email, iat and exp set
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + ttl` is outside the representable date range
    pub fn for_user(
        user_id: impl ToString,
        email: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::EncodingFailed("token expiry out of range".to_string()))?;

        Ok(Self {
            sub: user_id.to_string(),
            email: email.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }
}
