//! Wire models shared by every endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::STATUS_OK;
use super::error::ApiError;

/// `{entity, request_object}` body sent to every query/mutation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub entity: String,
    pub request_object: Value,
}

impl RequestBody {
    pub fn new(entity: impl Into<String>, request_object: Value) -> Self {
        Self {
            entity: entity.into(),
            request_object,
        }
    }
}

/// Uniform response wrapper.
///
/// Query and mutation endpoints answer with a status code; count and validation style
/// endpoints answer with a success flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Status {
        status_code: i64,
        #[serde(default)]
        response_object: Value,
    },
    Flag {
        success: bool,
        #[serde(default)]
        response_object: Value,
    },
}

impl Envelope {
    /// Validate a raw response value into an envelope
    pub fn parse(raw: Value) -> Result<Self, ApiError> {
        serde_json::from_value(raw).map_err(|e| ApiError::MalformedEnvelope(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        match self {
            Envelope::Status { status_code, .. } => *status_code == STATUS_OK,
            Envelope::Flag { success, .. } => *success,
        }
    }

    /// Payload on success, the server's message as an error otherwise
    pub fn into_result(self) -> Result<Value, ApiError> {
        let success = self.is_success();
        let response_object = match self {
            Envelope::Status {
                response_object, ..
            }
            | Envelope::Flag {
                response_object, ..
            } => response_object,
        };

        if success {
            Ok(response_object)
        } else {
            Err(ApiError::Application(message_of(&response_object)))
        }
    }
}

fn message_of(response_object: &Value) -> String {
    match response_object {
        Value::String(message) => message.clone(),
        Value::Null => "Unknown error".to_string(),
        other => other.to_string(),
    }
}

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Tokens returned by login and refresh
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenPair {
    pub token_jwt: String,
    /// Refresh responses may omit it, in which case the stored one stays valid
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn from_payload(payload: Value) -> Result<Self, ApiError> {
        serde_json::from_value(payload).map_err(|e| ApiError::MalformedEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_envelope() {
        let ok = Envelope::parse(json!({"status_code": 200, "response_object": [1, 2]})).unwrap();
        assert_eq!(ok.into_result().unwrap(), json!([1, 2]));

        let failed =
            Envelope::parse(json!({"status_code": 500, "response_object": "Duplicated code"}))
                .unwrap();
        match failed.into_result() {
            Err(ApiError::Application(message)) => assert_eq!(message, "Duplicated code"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_flag_envelope() {
        let ok = Envelope::parse(json!({"success": true, "response_object": 3})).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.into_result().unwrap(), json!(3));

        let failed = Envelope::parse(json!({"success": false, "response_object": "nope"})).unwrap();
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_malformed_envelope_fails_fast() {
        let result = Envelope::parse(json!({"data": []}));
        assert!(matches!(result, Err(ApiError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_token_pair() {
        let pair = TokenPair::from_payload(json!({"token_jwt": "a", "refresh_token": "b"})).unwrap();
        assert_eq!(pair.refresh_token.as_deref(), Some("b"));

        let refreshed = TokenPair::from_payload(json!({"token_jwt": "c"})).unwrap();
        assert!(refreshed.refresh_token.is_none());
    }
}
