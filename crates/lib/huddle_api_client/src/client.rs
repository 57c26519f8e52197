//! Request execution: credential attachment, error mapping, refresh-on-401.

use std::fmt;
use std::sync::Arc;

use huddle_core::session::{SessionError, SessionManager};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// How a request reacts to `401 Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthPolicy {
    /// `/auth/*` endpoints: a `401` is an ordinary failure (e.g. bad
    /// credentials) and never touches the session.
    Public,
    /// Everything else: a `401` triggers one refresh and one retry.
    SessionAware,
}

/// A request description that can be dispatched more than once.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    policy: AuthPolicy,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            query: Vec::new(),
            body: None,
            policy: AuthPolicy::SessionAware,
        }
    }

    pub(crate) fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub(crate) fn patch(segments: &[&str]) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub(crate) fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub(crate) fn public(mut self) -> Self {
        self.policy = AuthPolicy::Public;
        self
    }

    pub(crate) fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Huddle API client.
///
/// Cheap to share behind an `Arc`; concurrent requests are fine. Token
/// refreshes are single-flight: when several requests hit `401` at once only
/// the first performs the refresh, the others retry with the rotated token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
    refresh_lock: Mutex<()>,
    proactive_refresh: bool,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .field("proactive_refresh", &self.proactive_refresh)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client reading credentials from `session`.
    pub fn new(config: ClientConfig, session: Arc<SessionManager>) -> ApiResult<Self> {
        let base_url = config.parsed_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("huddle-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
            refresh_lock: Mutex::new(()),
            proactive_refresh: config.proactive_refresh,
        })
    }

    /// The session this client reads credentials from.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Send and decode a JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and decode a JSON body, using `T::default()` for an empty body.
    pub(crate) async fn send_json_or_default<T>(&self, request: &ApiRequest) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = self.send(request).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and ignore the response body.
    pub(crate) async fn send_empty(&self, request: &ApiRequest) -> ApiResult<()> {
        self.send(request).await?;
        Ok(())
    }

    /// Run a request through the session-aware pipeline. Returns only
    /// successful responses.
    async fn send(&self, request: &ApiRequest) -> ApiResult<Response> {
        let session_aware = request.policy == AuthPolicy::SessionAware;

        if session_aware && self.proactive_refresh && self.session.is_expired() {
            debug!(path = %request.path(), "access token expired, refreshing before request");
            let stale = self.session.access_token();
            self.refresh_after(stale.as_deref()).await?;
        }

        let token = self.session.access_token();
        let response = self.dispatch(request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !session_aware || token.is_none() {
            return ensure_success(response).await;
        }

        warn!(path = %request.path(), "request unauthorized, attempting token refresh");
        self.refresh_after(token.as_deref()).await?;

        let retry_token = self.session.access_token();
        let response = self.dispatch(request, retry_token.as_deref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %request.path(), "still unauthorized after refresh, clearing session");
            self.session.clear_auth()?;
            return Err(ApiError::SessionExpired);
        }
        ensure_success(response).await
    }

    /// Refresh the session unless another task already replaced `stale`.
    ///
    /// A `4xx` answer to the refresh call clears the session and yields
    /// [`ApiError::SessionExpired`]. Network failures, server errors and
    /// undecodable bodies leave the session as is and are returned unchanged.
    pub(crate) async fn refresh_after(&self, stale: Option<&str>) -> ApiResult<()> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.session.access_token();
        if current.is_some() && current.as_deref() != stale {
            debug!("access token already rotated by a concurrent refresh");
            return Ok(());
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            self.session.clear_auth()?;
            return Err(ApiError::SessionExpired);
        };

        let pair = match Box::pin(self.refresh_tokens(&refresh_token)).await {
            Ok(pair) => pair,
            Err(e @ ApiError::Api { status, .. }) if status.is_client_error() => {
                warn!(error = %e, "token refresh rejected, clearing session");
                self.session.clear_auth()?;
                return Err(ApiError::SessionExpired);
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, keeping session");
                return Err(e);
            }
        };

        match self.session.set_tokens(&pair) {
            Ok(()) => {
                info!("access token refreshed");
                Ok(())
            }
            Err(SessionError::InvalidTokenPair(reason)) => {
                warn!(%reason, "refresh returned an unusable token pair, clearing session");
                self.session.clear_auth()?;
                Err(ApiError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<Response> {
        let url = self.endpoint(&request.segments)?;
        debug!(
            method = %request.method,
            path = %request.path(),
            authenticated = token.is_some(),
            "sending request"
        );

        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder.send().await?)
    }

    /// Append path segments (percent-encoded) to the base URL.
    fn endpoint(&self, segments: &[String]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(ApiError::from_response(status, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ClientConfig::new(base), Arc::new(SessionManager::in_memory()))
            .expect("client")
    }

    #[test]
    fn endpoint_appends_to_versioned_base() {
        let c = client("http://localhost:8080/api/v1");
        let url = c
            .endpoint(&["events".to_string(), "e1".to_string(), "participants".to_string()])
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/events/e1/participants");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let c = client("http://localhost/api/v1/");
        let url = c.endpoint(&["categories".to_string()]).expect("url");
        assert_eq!(url.as_str(), "http://localhost/api/v1/categories");
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("http://localhost/api/v1");
        let url = c
            .endpoint(&["events".to_string(), "a/b c".to_string()])
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost/api/v1/events/a%2Fb%20c");
    }

    #[test]
    fn new_rejects_bad_base_url() {
        let err = ApiClient::new(
            ClientConfig::new("mailto:someone@example.com"),
            Arc::new(SessionManager::in_memory()),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn request_path_for_logging() {
        let req = ApiRequest::delete(&["events", "e1", "participants"]);
        assert_eq!(req.path(), "/events/e1/participants");
        assert_eq!(req.policy, AuthPolicy::SessionAware);
        assert_eq!(ApiRequest::post(&["auth", "login"]).public().policy, AuthPolicy::Public);
    }
}
