//! Query Clause Module
//!
//! Value objects describing a query against the remote query engine: selected fields,
//! filters, joins, grouping and ordering. Follows the same pattern as operations with
//! Query (reusable request object) and QueryBuilder (fluent).
//!
//! Every clause is a plain value with a deterministic round trip through the JSON object
//! shape the engine expects.

pub mod builder;
pub mod fields;
pub mod filters;
pub mod groupby;
pub mod joins;
pub mod orderby;
pub mod query;

pub use builder::QueryBuilder;
pub use fields::{AggregateFunction, FieldClause};
pub use filters::{FilterClause, FilterType, OperatorType};
pub use groupby::GroupByClause;
pub use joins::{JoinClause, JoinType};
pub use orderby::{OrderByClause, OrderByType};
pub use query::Query;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Serialization contract shared by every clause type
pub trait Clause: Serialize + DeserializeOwned {
    /// Plain key-value form, as embedded in request bodies
    fn to_object(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// JSON string form
    fn serialize_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Rebuild a clause from its plain key-value form
    fn from_object(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Rebuild a clause from a JSON string
    fn from_json(serialized: &str) -> serde_json::Result<Self> {
        serde_json::from_str(serialized)
    }
}

/// Treat an empty clause list the same as an absent one.
///
/// The engine distinguishes "no constraint" (`null`) from "empty constraint" (`[]`),
/// and the console never means the latter.
pub fn non_empty<C: Clone>(clauses: Option<&[C]>) -> Option<Vec<C>> {
    match clauses {
        Some(list) if !list.is_empty() => Some(list.to_vec()),
        _ => None,
    }
}

/// Deserialize a list of clauses from a JSON string holding an array (or `null`)
pub fn list_from_json<C: Clause>(serialized: &str) -> serde_json::Result<Option<Vec<C>>> {
    serde_json::from_str(serialized)
}
