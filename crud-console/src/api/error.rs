//! Gateway error taxonomy

use thiserror::Error;

/// Errors raised at the API boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure or a response that could not be read
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body was not JSON
    #[error("response is not valid JSON: {0}")]
    Decode(String),

    /// Response was JSON but not a `{status_code|success, response_object}` envelope
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// Non-success envelope; carries the server's human-readable message
    #[error("{0}")]
    Application(String),

    /// No successful login or refresh has been recorded for this session
    #[error("not authenticated: log in first")]
    NotAuthenticated,

    /// The refresh call failed; the guarded call was not attempted
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Session storage could not be read or written
    #[error("session storage error: {0}")]
    Session(String),
}

impl ApiError {
    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_surfaced_verbatim() {
        let error = ApiError::Application("Code already in use".to_string());
        assert_eq!(error.user_message(), "Code already in use");
        assert_eq!(
            ApiError::NotAuthenticated.user_message(),
            "not authenticated: log in first"
        );
    }
}
