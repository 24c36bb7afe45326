//! HTTP transport seam
//!
//! The gateway only needs "send this descriptor to this URL and give me the JSON back".
//! [`ReqwestTransport`] does that over HTTP; tests substitute a scripted transport.

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::error::ApiError;
use super::request::{HttpMethod, RequestOptions};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and decode the response body as JSON
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError>;
}

/// reqwest-backed transport. No timeouts and no retries are applied.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        let mut request = self.http.request(to_method(options.method), url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("{} {} -> {} ({} bytes)", options.method, url, status, text.len());

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
