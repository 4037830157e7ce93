//! # HTTP Transport
//!
//! The seam between the cart store and the backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Flow                                    │
//! │                                                                         │
//! │  CartStore                HttpTransport              Backend            │
//! │  ─────────                ─────────────              ───────            │
//! │                                                                         │
//! │  load() ──► ApiRequest::get("/carrinho") ──────────► GET /carrinho     │
//! │                                                                         │
//! │  checkout() ──► ApiRequest::post("/carrinho", body) ► POST /carrinho   │
//! │                                                                         │
//! │                 ◄──────── ApiResponse { status, data } ◄───────         │
//! │                                                                         │
//! │  Non-2xx statuses come back as ClientError::HttpStatus, so the store   │
//! │  only ever sees successful bodies in Ok(..).                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ReqwestTransport`] is the production implementation. Tests substitute
//! their own [`HttpTransport`] to script responses.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP methods the cart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path such as `/carrinho`.
    pub path: String,
    /// JSON body (POST only).
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        ApiRequest {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A successful backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` when the body was empty.
    pub data: Value,
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends requests to the backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns the decoded body of a 2xx response.
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}

// =============================================================================
// Reqwest Transport
// =============================================================================

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds a transport from `[api]` settings.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self::with_client(settings.parsed_base_url()?, client))
    }

    /// Wraps an existing client.
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        ReqwestTransport {
            client,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the base URL.
    ///
    /// The leading `/` is dropped so a base with a path prefix
    /// (`https://host/api/`) keeps that prefix.
    pub fn url_for(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, "Sending request");

        let builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        let builder = match request.body {
            Some(ref body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(method = %request.method, %url, status = status.as_u16(), "Backend rejected request");
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        debug!(method = %request.method, %url, status = status.as_u16(), "Request completed");
        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}
