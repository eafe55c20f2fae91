//! HTTP Transport
//!
//! The seam between the API client and the network. The client decides what
//! to send and which token to attach; the transport only moves bytes.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use crate::error::{ApiError, Result};

/// Fully resolved request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    /// Sent as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Status and body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Turn a non-2xx response into `ApiError::Status`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }
}

/// Sends one request and returns whatever status came back.
///
/// Futures are not `Send`: in the browser everything runs on the UI thread.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

/// `reqwest`-backed transport (fetch in the browser, hyper natively)
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse> {
        let mut builder = self.http.request(request.method.clone(), request.url.clone());
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        // A body cut short is a network failure, not an empty response
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("reading {status} response body: {e}")))?;
        Ok(HttpResponse { status, body })
    }
}
