//! Endpoint paths, header names and session keys

/// Query/mutation endpoints, relative to the configured API URL
pub mod endpoints {
    pub const SELECT: &str = "/select";
    pub const COUNT: &str = "/count";
    pub const LOAD: &str = "/load";
    pub const CREATE: &str = "/create";
    pub const UPDATE: &str = "/update";
    pub const DELETE: &str = "/delete";

    /// Relative to the configured user URL
    pub const LOGIN: &str = "/login";
    pub const REFRESH_TOKEN: &str = "/refresh_token";
}

pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    pub const AUTHORIZATION: &str = "Authorization";

    pub const JSON: &str = "application/json";
    pub const JSON_UTF8: &str = "application/json; charset=utf-8";
    pub const ANY_ORIGIN: &str = "*";
}

/// Success code of `{status_code, response_object}` envelopes
pub const STATUS_OK: i64 = 200;

/// Page size used by type-ahead suggestions
pub const SUGGESTION_LIMIT: u64 = 25;

/// Default refresh threshold: half of a one hour token lifetime
pub const DEFAULT_REFRESH_THRESHOLD_SECS: u64 = 30 * 60;
