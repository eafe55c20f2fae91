//! API Client
//!
//! Attaches the stored bearer token to every request and turns a 401 into
//! either a replay after one shared token refresh, or a session teardown.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::transport::{HttpResponse, HttpTransport, OutgoingRequest, ReqwestTransport};
use crate::auth::{
    NoopSessionListener, RefreshCoordinator, RefreshLease, RefreshTicket, SessionListener, TokenStore,
};
use crate::config::ApiConfig;
use crate::domain::AuthTokens;
use crate::error::{ApiError, AuthError, Result};

/// Token refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

/// A request before token attachment and URL resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path relative to the configured base URL
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Set once the request has been replayed after a refresh
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// True for the refresh endpoint whatever leading/trailing slashes the
    /// path was written with
    pub fn is_refresh(&self) -> bool {
        let path = self.path.trim_matches('/');
        let refresh = REFRESH_PATH.trim_matches('/');
        path.strip_suffix(refresh)
            .is_some_and(|prefix| prefix.is_empty() || prefix.ends_with('/'))
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    refresh_token: String,
}

/// REST client with transparent, single-flight token refresh
pub struct ApiClient {
    config: ApiConfig,
    transport: Box<dyn HttpTransport>,
    tokens: Box<dyn TokenStore>,
    listener: Box<dyn SessionListener>,
    coordinator: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        transport: impl HttpTransport + 'static,
        tokens: impl TokenStore + 'static,
    ) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            tokens: Box::new(tokens),
            listener: Box::new(NoopSessionListener),
            coordinator: RefreshCoordinator::new(),
        }
    }

    /// Client over `reqwest`
    pub fn with_reqwest(config: ApiConfig, tokens: impl TokenStore + 'static) -> Self {
        Self::new(config, ReqwestTransport::new(), tokens)
    }

    /// Be told when a failed refresh ends the session
    pub fn with_session_listener(mut self, listener: impl SessionListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Send a request, refreshing the token once on 401.
    ///
    /// Non-401 responses are returned as-is whatever their status; 401s that
    /// cannot be recovered become `ApiError::Unauthorized` or `ApiError::Auth`.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        let response = self.dispatch(&request, self.tokens.access_token()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        self.recover_unauthorized(request).await
    }

    /// Send and decode a JSON body from a 2xx response
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let response = self.send(request).await?.error_for_status()?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Send and discard the body of a 2xx response
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await?.error_for_status()?;
        Ok(())
    }

    async fn dispatch(&self, request: &ApiRequest, bearer: Option<String>) -> Result<HttpResponse> {
        let outgoing = OutgoingRequest {
            method: request.method.clone(),
            url: self.config.endpoint(&request.path)?,
            bearer,
            body: request.body.clone(),
        };
        tracing::debug!(
            method = %outgoing.method,
            path = %request.path,
            authenticated = outgoing.bearer.is_some(),
            retried = request.retried,
            "api request"
        );
        self.transport.execute(&outgoing).await
    }

    async fn recover_unauthorized(&self, mut request: ApiRequest) -> Result<HttpResponse> {
        if request.retried || request.is_refresh() {
            return Err(ApiError::Unauthorized);
        }
        request.retried = true;

        let token = match self.coordinator.acquire() {
            RefreshTicket::Leader(lease) => self.refresh_session(lease).await?,
            RefreshTicket::Follower(waiter) => waiter.wait().await?,
        };

        let response = self.dispatch(&request, Some(token)).await?;
        if response.is_unauthorized() {
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    /// Leader path: exchange the refresh token and publish the outcome
    async fn refresh_session(&self, lease: RefreshLease<'_>) -> Result<String> {
        match self.request_new_tokens().await {
            Ok(tokens) => {
                self.tokens.store(&tokens);
                let released = lease.settle(Ok(tokens.access_token.clone()));
                tracing::info!(released, "access token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                let released = lease.settle(Err(err.clone()));
                self.tokens.clear();
                tracing::warn!(error = %err, released, "token refresh failed, ending session");
                self.listener.session_expired();
                Err(err.into())
            }
        }
    }

    async fn request_new_tokens(&self) -> std::result::Result<AuthTokens, AuthError> {
        let refresh_token = self.tokens.refresh_token().ok_or(AuthError::NoRefreshToken)?;
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest { refresh_token })
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let response = self
            .dispatch(&request, self.tokens.access_token())
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;
        if !response.is_success() {
            return Err(AuthError::RefreshRejected {
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| AuthError::RefreshFailed(e.to_string()))
    }
}
