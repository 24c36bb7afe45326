//! Core Operation types for the remote query engine

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::api::constants::endpoints;
use crate::api::models::{Credentials, RequestBody};

/// Which configured base URL an operation is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointBase {
    Api,
    User,
}

/// A single call against the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// List rows matching a query
    Select(RequestBody),
    /// Count rows matching a query's joins and filters
    Count(RequestBody),
    /// Load a full record by id
    Load(RequestBody),
    /// Insert a record
    Create(RequestBody),
    /// Update a record
    Update(RequestBody),
    /// Delete a record
    Delete(RequestBody),
    /// Exchange credentials for an access/refresh token pair
    Login {
        username: String,
        password: String,
    },
    /// Exchange the stored refresh token for a new access token
    RefreshToken,
}

impl Operation {
    /// Endpoint path, relative to the operation's base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Select(_) => endpoints::SELECT,
            Self::Count(_) => endpoints::COUNT,
            Self::Load(_) => endpoints::LOAD,
            Self::Create(_) => endpoints::CREATE,
            Self::Update(_) => endpoints::UPDATE,
            Self::Delete(_) => endpoints::DELETE,
            Self::Login { .. } => endpoints::LOGIN,
            Self::RefreshToken => endpoints::REFRESH_TOKEN,
        }
    }

    pub fn base(&self) -> EndpointBase {
        match self {
            Self::Login { .. } | Self::RefreshToken => EndpointBase::User,
            _ => EndpointBase::Api,
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Count(_) => "count",
            Self::Load(_) => "load",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Login { .. } => "login",
            Self::RefreshToken => "refresh_token",
        }
    }

    /// Target entity name, when the operation has one
    pub fn entity(&self) -> Option<&str> {
        self.request_body().map(|body| body.entity.as_str())
    }

    pub fn request_body(&self) -> Option<&RequestBody> {
        match self {
            Self::Select(body)
            | Self::Count(body)
            | Self::Load(body)
            | Self::Create(body)
            | Self::Update(body)
            | Self::Delete(body) => Some(body),
            Self::Login { .. } | Self::RefreshToken => None,
        }
    }

    /// Login is the only call made without a bearer token
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login { .. })
    }

    /// Whether this call goes through the access-token refresh guard
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Self::Login { .. } | Self::RefreshToken)
    }

    /// JSON body to send, `None` when the endpoint needs nothing beyond the token
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Login { username, password } => Some(json!({
                "request_object": Credentials {
                    username: username.clone(),
                    password: password.clone(),
                }
            })),
            Self::RefreshToken => None,
            _ => self
                .request_body()
                .and_then(|body| serde_json::to_value(body).ok()),
        }
    }
}
