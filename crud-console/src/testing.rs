//! Test doubles shared by unit tests

use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{
    ApiClient, ApiError, AuthManager, Clock, MemorySessionStore, RequestOptions, Session,
    Transport,
};
use crate::controller::{Notification, Notifier};

pub const TEST_API_URL: &str = "http://api.test";
pub const TEST_USER_URL: &str = "http://users.test";
pub const TEST_NOW: i64 = 1_700_000_000;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub options: RequestOptions,
}

/// Replays queued responses in order and records every request
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// `{status_code: 200, response_object}`
    pub fn push_ok(&self, payload: Value) {
        self.push_raw(json!({"status_code": 200, "response_object": payload}));
    }

    /// `{status_code: 500, response_object: message}`
    pub fn push_failure(&self, message: &str) {
        self.push_raw(json!({"status_code": 500, "response_object": message}));
    }

    /// `{success, response_object}`
    pub fn push_flag(&self, success: bool, payload: Value) {
        self.push_raw(json!({"success": success, "response_object": payload}));
    }

    pub fn push_transport_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Transport(message.to_string())));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no scripted response for {}", url))))
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

/// Client with a fresh session and a scripted transport
pub fn logged_in_client() -> (ApiClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let auth = AuthManager::new(
        Arc::new(MemorySessionStore::with_session(Session {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            last_refresh: Some(TEST_NOW),
        })),
        Arc::new(FixedClock::new(TEST_NOW)),
        1800,
    );
    let client = ApiClient::new(TEST_API_URL, TEST_USER_URL, transport.clone(), auth);
    (client, transport)
}
