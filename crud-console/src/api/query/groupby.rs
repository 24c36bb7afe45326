//! Group-by clauses

use serde::{Deserialize, Serialize};

use super::Clause;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByClause {
    pub field_name: String,
}

impl Clause for GroupByClause {}

impl GroupByClause {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}
