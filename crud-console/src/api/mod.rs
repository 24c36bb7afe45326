//! Remote Query Engine API Module
//!
//! Everything the console needs to talk to the remote query engine: query clauses,
//! request descriptors, response envelopes, the operation catalogue, bearer-token
//! lifecycle and the gateway client that ties them together.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod models;
pub mod operations;
pub mod query;
pub mod request;
pub mod transport;

pub use auth::{AuthManager, Clock, MemorySessionStore, Session, SessionStore, SystemClock};
pub use client::{ApiClient, LoadingTracker};
pub use error::ApiError;
pub use models::{Credentials, Envelope, RequestBody, TokenPair};
pub use operations::{EndpointBase, Operation};
pub use query::{
    AggregateFunction, Clause, FieldClause, FilterClause, FilterType, GroupByClause, JoinClause,
    JoinType, OperatorType, OrderByClause, OrderByType, Query, QueryBuilder,
};
pub use request::{HttpMethod, RequestOptions, build_request_options};
pub use transport::{ReqwestTransport, Transport};
