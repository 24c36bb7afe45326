//! Filter clauses: predicates with boolean composition and nesting

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Clause;

/// Comparison applied by a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    Equals,
    NotEquals,
    Like,
    NotLike,
    In,
    NotIn,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    Between,
    StartsWith,
    EndsWith,
}

/// How a clause combines with the clause preceding it in the same list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorType {
    #[default]
    And,
    Or,
}

/// A single predicate, or a parenthesized group when `related_filter_clauses` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field_name: String,
    #[serde(default)]
    pub table_alias: Option<String>,
    pub filter_type: FilterType,
    #[serde(default)]
    pub object_to_compare: Value,
    /// Operator relative to the previous clause. `null` on the wire reads as AND.
    #[serde(default, deserialize_with = "null_as_and")]
    pub operator_type: OperatorType,
    #[serde(default)]
    pub related_filter_clauses: Option<Vec<FilterClause>>,
}

impl Clause for FilterClause {}

fn null_as_and<'de, D>(deserializer: D) -> Result<OperatorType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OperatorType>::deserialize(deserializer)?.unwrap_or_default())
}

impl FilterClause {
    /// Create an AND-combined filter
    pub fn new(
        field_name: impl Into<String>,
        filter_type: FilterType,
        object_to_compare: impl Into<Value>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            table_alias: None,
            filter_type,
            object_to_compare: object_to_compare.into(),
            operator_type: OperatorType::And,
            related_filter_clauses: None,
        }
    }

    pub fn equals(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, FilterType::Equals, value)
    }

    pub fn not_equals(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, FilterType::NotEquals, value)
    }

    pub fn starts_with(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, FilterType::StartsWith, value)
    }

    /// Set the operator relative to the previous clause
    pub fn with_operator(mut self, operator_type: OperatorType) -> Self {
        self.operator_type = operator_type;
        self
    }

    /// Shorthand for `with_operator(OperatorType::Or)`
    pub fn or(self) -> Self {
        self.with_operator(OperatorType::Or)
    }

    pub fn with_alias(mut self, table_alias: impl Into<String>) -> Self {
        self.table_alias = Some(table_alias.into());
        self
    }

    /// Attach a parenthesized sub-expression evaluated together with this clause
    pub fn with_related(mut self, related: Vec<FilterClause>) -> Self {
        self.related_filter_clauses = if related.is_empty() { None } else { Some(related) };
        self
    }

    /// Whether this clause opens a parenthesized group
    pub fn is_group(&self) -> bool {
        self.related_filter_clauses
            .as_ref()
            .is_some_and(|related| !related.is_empty())
    }

    /// Nesting depth: 1 for a plain clause, +1 per level of related clauses
    pub fn depth(&self) -> usize {
        1 + self
            .related_filter_clauses
            .iter()
            .flatten()
            .map(FilterClause::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Reset the operator of the first clause of a list (and of every nested list) to AND.
///
/// The operator describes composition with the preceding clause, so a leading clause has
/// nothing to compose with and its operator carries no meaning.
pub fn normalize_leading_operators(clauses: &mut [FilterClause]) {
    if let Some(first) = clauses.first_mut() {
        first.operator_type = OperatorType::And;
    }
    for clause in clauses.iter_mut() {
        if let Some(related) = clause.related_filter_clauses.as_mut() {
            normalize_leading_operators(related);
        }
    }
}
