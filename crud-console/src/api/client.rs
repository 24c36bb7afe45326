//! Gateway client
//!
//! One primitive, [`ApiClient::make_request`]: refresh the token when due, build the request
//! descriptor, send it, and unwrap the response envelope.

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::auth::AuthManager;
use super::error::ApiError;
use super::models::{Envelope, TokenPair};
use super::operations::{EndpointBase, Operation};
use super::request::{HttpMethod, build_request_options};
use super::transport::Transport;

/// Counter of in-flight blocking calls, backing the "work in progress" indicator
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a blocking call as started; it ends when the guard drops
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }
}

pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client for the query/mutation and user endpoints
#[derive(Clone)]
pub struct ApiClient {
    api_url: String,
    user_url: String,
    transport: Arc<dyn Transport>,
    auth: AuthManager,
    loading: LoadingTracker,
}

impl ApiClient {
    pub fn new(
        api_url: impl Into<String>,
        user_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        auth: AuthManager,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            user_url: user_url.into(),
            transport,
            auth,
            loading: LoadingTracker::new(),
        }
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn loading(&self) -> &LoadingTracker {
        &self.loading
    }

    fn url_for(&self, operation: &Operation) -> String {
        let base = match operation.base() {
            EndpointBase::Api => &self.api_url,
            EndpointBase::User => &self.user_url,
        };
        format!("{}{}", base.trim_end_matches('/'), operation.path())
    }

    /// Execute an operation and return the envelope payload.
    ///
    /// Guarded operations refresh the access token first when it is due; a failed refresh
    /// aborts the call. Blocking calls are counted by the loading tracker while in flight.
    pub async fn make_request(
        &self,
        operation: &Operation,
        blocking: bool,
    ) -> Result<Value, ApiError> {
        let _loading = blocking.then(|| self.loading.begin());

        if operation.is_guarded() {
            self.ensure_fresh_token().await?;
        }

        let token = if operation.requires_auth() {
            Some(self.auth.access_token().await?)
        } else {
            None
        };

        self.send(operation, token.as_deref()).await
    }

    async fn send(&self, operation: &Operation, token: Option<&str>) -> Result<Value, ApiError> {
        let body = operation.body();
        let options = build_request_options(HttpMethod::Post, token, body.as_ref(), None)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let url = self.url_for(operation);

        debug!(
            "Calling {} ({})",
            url,
            operation.entity().unwrap_or("-")
        );

        let result = match self.transport.send(&url, &options).await {
            Ok(raw) => Envelope::parse(raw).and_then(Envelope::into_result),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("{} failed: {}", operation.operation_type(), e);
        }
        result
    }

    /// Refresh the access token when the threshold has passed
    pub async fn ensure_fresh_token(&self) -> Result<(), ApiError> {
        if !self.auth.refresh_due().await? {
            return Ok(());
        }

        info!("Access token is due for refresh");
        let refresh_token = self
            .auth
            .refresh_token()
            .await
            .map_err(|e| ApiError::RefreshFailed(e.to_string()))?;

        let payload = self
            .send(&Operation::RefreshToken, Some(&refresh_token))
            .await
            .map_err(|e| ApiError::RefreshFailed(e.user_message()))?;
        let tokens =
            TokenPair::from_payload(payload).map_err(|e| ApiError::RefreshFailed(e.to_string()))?;

        self.auth.record_tokens(tokens).await
    }

    /// Log in and store the returned token pair
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let operation = Operation::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        let payload = self.make_request(&operation, true).await?;
        let tokens = TokenPair::from_payload(payload)?;
        self.auth.record_tokens(tokens).await?;
        info!("Logged in as {}", username);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.auth.logout().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{MemorySessionStore, Session};
    use crate::api::models::RequestBody;
    use crate::testing::{FixedClock, MockTransport};
    use serde_json::json;

    fn client_at(now: i64, session: Session) -> (ApiClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let auth = AuthManager::new(
            Arc::new(MemorySessionStore::with_session(session)),
            Arc::new(FixedClock::new(now)),
            1800,
        );
        let client = ApiClient::new(
            "http://api.local/",
            "http://users.local",
            transport.clone(),
            auth,
        );
        (client, transport)
    }

    fn fresh_session(last_refresh: i64) -> Session {
        Session {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            last_refresh: Some(last_refresh),
        }
    }

    fn select() -> Operation {
        Operation::Select(RequestBody::new("Cliente", json!({})))
    }

    #[tokio::test]
    async fn test_fresh_token_goes_straight_to_call() {
        let (client, transport) = client_at(1_000 + 1799, fresh_session(1_000));
        transport.push_ok(json!([]));

        let payload = client.make_request(&select(), true).await.unwrap();
        assert_eq!(payload, json!([]));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "http://api.local/select");
        assert_eq!(calls[0].options.header("Authorization"), Some("Bearer access"));
        assert_eq!(client.loading().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_once_before_call() {
        let (client, transport) = client_at(1_000 + 1801, fresh_session(1_000));
        transport.push_ok(json!({"token_jwt": "renewed"}));
        transport.push_ok(json!([]));

        client.make_request(&select(), true).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://users.local/refresh_token");
        assert_eq!(calls[0].options.header("Authorization"), Some("Bearer refresh"));
        assert_eq!(calls[1].url, "http://api.local/select");
        assert_eq!(calls[1].options.header("Authorization"), Some("Bearer renewed"));

        let session = client.auth().session().await.unwrap();
        assert_eq!(session.last_refresh, Some(2_801));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_refresh_failure_aborts_guarded_call() {
        let (client, transport) = client_at(10_000, fresh_session(1_000));
        transport.push_failure("expired");

        let result = client.make_request(&select(), true).await;
        assert!(matches!(result, Err(ApiError::RefreshFailed(_))));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_never_logged_in_fails_without_calling() {
        let (client, transport) = client_at(10_000, Session::default());

        let result = client.make_request(&select(), false).await;
        assert!(matches!(result, Err(ApiError::NotAuthenticated)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_has_no_bearer_and_records_tokens() {
        let (client, transport) = client_at(42, Session::default());
        transport.push_ok(json!({"token_jwt": "t", "refresh_token": "r"}));

        client.login("admin", "pw").await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].url, "http://users.local/login");
        assert!(calls[0].options.header("Authorization").is_none());
        assert_eq!(
            calls[0].options.body_json(),
            Some(json!({"request_object": {"username": "admin", "password": "pw"}}))
        );

        let session = client.auth().session().await.unwrap();
        assert_eq!(session, Session {
            access_token: Some("t".into()),
            refresh_token: Some("r".into()),
            last_refresh: Some(42),
        });
    }

    #[tokio::test]
    async fn test_application_error_is_surfaced() {
        let (client, transport) = client_at(1_000, fresh_session(1_000));
        transport.push_failure("Duplicated code");

        match client.make_request(&select(), true).await {
            Err(ApiError::Application(message)) => assert_eq!(message, "Duplicated code"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_loading_guard_counts() {
        let tracker = LoadingTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);
        drop(first);
        assert!(tracker.is_loading());
        drop(second);
        assert!(!tracker.is_loading());
    }
}
