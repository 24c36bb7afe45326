//! Order-by clauses

use serde::{Deserialize, Serialize};

use super::Clause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderByType {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByClause {
    pub field_name: String,
    pub order_by_type: OrderByType,
}

impl Clause for OrderByClause {}

impl OrderByClause {
    pub fn new(field_name: impl Into<String>, order_by_type: OrderByType) -> Self {
        Self {
            field_name: field_name.into(),
            order_by_type,
        }
    }

    pub fn asc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, OrderByType::Asc)
    }

    pub fn desc(field_name: impl Into<String>) -> Self {
        Self::new(field_name, OrderByType::Desc)
    }
}
