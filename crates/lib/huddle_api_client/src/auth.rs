//! `/auth/*` endpoints.

use huddle_core::models::{
    LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, TokensEnvelope,
};
use huddle_core::session::TokenPair;
use tracing::{info, warn};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

impl ApiClient {
    /// Log in and store the issued token pair in the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenPair> {
        let request = ApiRequest::post(&["auth", "login"]).public().json(&LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        })?;
        let envelope: TokensEnvelope = self.send_json(&request).await?;
        self.session().set_tokens(&envelope.tokens)?;
        info!(email, "logged in");
        Ok(envelope.tokens)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, payload: &RegisterRequest) -> ApiResult<RegisterResponse> {
        let request = ApiRequest::post(&["auth", "register"]).public().json(payload)?;
        let response = self.send_json_or_default(&request).await?;
        info!(email = %payload.email, "account registered");
        Ok(response)
    }

    /// Exchange a refresh token for a new pair. Does not touch the session.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let request = ApiRequest::post(&["auth", "refresh-token"])
            .public()
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_owned(),
            })?;
        let envelope: TokensEnvelope = self.send_json(&request).await?;
        Ok(envelope.tokens)
    }

    /// Rotate the session's tokens now.
    ///
    /// Fails with [`ApiError::SessionExpired`](crate::ApiError::SessionExpired)
    /// when there is no session or the server rejects the refresh token.
    pub async fn refresh_session(&self) -> ApiResult<()> {
        let current = self.session().access_token();
        self.refresh_after(current.as_deref()).await
    }

    /// Revoke the session server-side (best effort) and clear it locally.
    pub async fn logout(&self) -> ApiResult<()> {
        if self.session().is_authenticated() {
            let request = ApiRequest::post(&["auth", "logout"]).public();
            if let Err(e) = self.send_empty(&request).await {
                warn!(error = %e, "server-side logout failed, clearing local session anyway");
            }
        }
        self.session().clear_auth()?;
        info!("logged out");
        Ok(())
    }
}
