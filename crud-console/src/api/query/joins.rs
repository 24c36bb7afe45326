//! Join clauses: relation traversal

use serde::{Deserialize, Serialize};

use super::Clause;

/// Join kind, as named on the wire (`INNER_JOIN`, `LEFT_JOIN`, `RIGHT_JOIN`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinType {
    InnerJoin,
    LeftJoin,
    RightJoin,
}

/// Traverse a relation of the target entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    /// Path to the related entity, dotted for nested relations (e.g. "tipo_cliente.usuario_creacion")
    pub field_name: String,
    pub join_type: JoinType,
    /// Materialize the full related entity instead of only enabling filtering through it
    #[serde(default)]
    pub is_join_with_fetch: bool,
}

impl Clause for JoinClause {}

impl JoinClause {
    pub fn new(field_name: impl Into<String>, join_type: JoinType) -> Self {
        Self {
            field_name: field_name.into(),
            join_type,
            is_join_with_fetch: false,
        }
    }

    pub fn inner(field_name: impl Into<String>) -> Self {
        Self::new(field_name, JoinType::InnerJoin)
    }

    pub fn left(field_name: impl Into<String>) -> Self {
        Self::new(field_name, JoinType::LeftJoin)
    }

    /// Ask the engine to fetch the related entity
    pub fn with_fetch(mut self) -> Self {
        self.is_join_with_fetch = true;
        self
    }

    /// Relation path split on dots
    pub fn path(&self) -> Vec<&str> {
        self.field_name.split('.').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let join = JoinClause::left("tipo_cliente.usuario_creacion").with_fetch();
        let object = join.to_object().unwrap();
        assert_eq!(
            object,
            json!({
                "field_name": "tipo_cliente.usuario_creacion",
                "join_type": "LEFT_JOIN",
                "is_join_with_fetch": true
            })
        );
        assert_eq!(JoinClause::from_object(object).unwrap(), join);
        assert_eq!(join.path(), vec!["tipo_cliente", "usuario_creacion"]);
    }

    #[test]
    fn test_missing_fetch_flag_defaults_false() {
        let join = JoinClause::from_json(r#"{"field_name":"tipo_cliente","join_type":"INNER_JOIN"}"#)
            .unwrap();
        assert!(!join.is_join_with_fetch);
        assert_eq!(join.join_type, JoinType::InnerJoin);
    }
}
