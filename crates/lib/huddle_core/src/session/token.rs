//! Token pair issued by the auth service.

use serde::{Deserialize, Serialize};

use super::state::is_blank;
use super::{Result, SessionError};

/// Access/refresh token pair as returned by `/auth/login` and
/// `/auth/refresh-token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until `access_token` expires, relative to mint time.
    pub expires_in: i64,
    /// Informational only (conventionally `"Bearer"`).
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenPair {
    /// Build a bearer token pair.
    pub fn bearer(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            token_type: default_token_type(),
        }
    }

    /// Reject pairs that would leave the session half-populated.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.access_token) {
            return Err(SessionError::InvalidTokenPair(
                "access_token is empty".into(),
            ));
        }
        if is_blank(&self.refresh_token) {
            return Err(SessionError::InvalidTokenPair(
                "refresh_token is empty".into(),
            ));
        }
        if self.expires_in < 0 {
            return Err(SessionError::InvalidTokenPair(format!(
                "expires_in must be non-negative, got {}",
                self.expires_in
            )));
        }
        Ok(())
    }
}
