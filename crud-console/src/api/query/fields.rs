//! Field clauses: selection, aggregation and aliasing

use serde::{Deserialize, Serialize};

use super::Clause;

/// SQL aggregate applied to a selected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Min,
    Max,
    Sum,
    Avg,
}

/// A selected field (SELECT list entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldClause {
    pub field_name: String,
    #[serde(default)]
    pub aggregate_function: Option<AggregateFunction>,
    #[serde(default)]
    pub is_select_distinct: bool,
    #[serde(default)]
    pub field_label: Option<String>,
}

impl Clause for FieldClause {}

impl FieldClause {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            aggregate_function: None,
            is_select_distinct: false,
            field_label: None,
        }
    }

    pub fn aggregate(field_name: impl Into<String>, function: AggregateFunction) -> Self {
        Self {
            aggregate_function: Some(function),
            ..Self::new(field_name)
        }
    }

    pub fn distinct(mut self) -> Self {
        self.is_select_distinct = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_with_aggregate() {
        let field = FieldClause::aggregate("saldo", AggregateFunction::Sum)
            .distinct()
            .with_label("total");
        let object = field.to_object().unwrap();

        assert_eq!(
            object,
            json!({
                "field_name": "saldo",
                "aggregate_function": "SUM",
                "is_select_distinct": true,
                "field_label": "total"
            })
        );
        assert_eq!(FieldClause::from_object(object).unwrap(), field);
    }

    #[test]
    fn test_plain_field_defaults() {
        let field = FieldClause::from_json(r#"{"field_name":"codigo"}"#).unwrap();
        assert_eq!(field, FieldClause::new("codigo"));
    }
}
