//! Transport-ready request descriptors

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::constants::headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the method carries a JSON body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method, headers and serialized body of one request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Parse the body back into JSON (used by tests and request logging)
    pub fn body_json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Build a request descriptor.
///
/// Default headers are JSON accept/content-type plus a permissive allow-origin, and a
/// bearer authorization when `token` is set. Explicit `extra_headers` replace the defaults
/// entirely. Write-style methods always carry a body, `{}` when none is given.
pub fn build_request_options<B: Serialize>(
    method: HttpMethod,
    token: Option<&str>,
    body: Option<&B>,
    extra_headers: Option<BTreeMap<String, String>>,
) -> serde_json::Result<RequestOptions> {
    let headers = match extra_headers {
        Some(explicit) => explicit,
        None => default_headers(token),
    };

    let body = if method.has_body() {
        let value = match body {
            Some(body) => serde_json::to_value(body)?,
            None => Value::Null,
        };
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };
        Some(serde_json::to_string(&value)?)
    } else {
        None
    };

    Ok(RequestOptions {
        method,
        headers,
        body,
    })
}

fn default_headers(token: Option<&str>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert(headers::ACCEPT.to_string(), headers::JSON.to_string());
    map.insert(headers::CONTENT_TYPE.to_string(), headers::JSON_UTF8.to_string());
    map.insert(headers::ALLOW_ORIGIN.to_string(), headers::ANY_ORIGIN.to_string());
    if let Some(token) = token {
        map.insert(headers::AUTHORIZATION.to_string(), format!("Bearer {}", token));
    }
    map
}
