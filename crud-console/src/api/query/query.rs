//! Reusable query request object

use serde::{Deserialize, Serialize};

use super::filters::normalize_leading_operators;
use super::{
    FieldClause, FilterClause, GroupByClause, JoinClause, OrderByClause, QueryBuilder, non_empty,
};

/// The `request_object` of list, count and suggestion requests.
///
/// Absent clause lists serialize as `null`, never as `[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub fields: Option<Vec<FieldClause>>,
    #[serde(default)]
    pub joins: Option<Vec<JoinClause>>,
    #[serde(default)]
    pub filters: Option<Vec<FilterClause>>,
    #[serde(default)]
    pub group_by: Option<Vec<GroupByClause>>,
    #[serde(default)]
    pub order: Option<Vec<OrderByClause>>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl Query {
    /// Start building a new query
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Assemble a query from borrowed clause lists, dropping empty ones
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        fields: Option<&[FieldClause]>,
        joins: Option<&[JoinClause]>,
        filters: Option<&[FilterClause]>,
        group_by: Option<&[GroupByClause]>,
        order: Option<&[OrderByClause]>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Self {
        let mut filters = non_empty(filters);
        if let Some(list) = filters.as_mut() {
            normalize_leading_operators(list);
        }

        Self {
            fields: non_empty(fields),
            joins: non_empty(joins),
            filters,
            group_by: non_empty(group_by),
            order: non_empty(order),
            offset,
            limit,
        }
    }

    /// Keep only what a count needs: joins and filters
    pub fn for_count(&self) -> Self {
        Self {
            joins: self.joins.clone(),
            filters: self.filters.clone(),
            ..Self::default()
        }
    }

    /// Names of the selected fields, in selection order
    pub fn selected_field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .flatten()
            .map(|field| field.field_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{Clause, OperatorType};
    use serde_json::{Value, json};

    #[test]
    fn test_empty_lists_serialize_as_null() {
        let filters = vec![FilterClause::equals("codigo", "AB12")];
        let order = vec![OrderByClause::asc("codigo")];
        let no_fields: Vec<FieldClause> = Vec::new();
        let no_groups: Vec<GroupByClause> = Vec::new();
        let query = Query::from_parts(
            Some(no_fields.as_slice()),
            None,
            Some(filters.as_slice()),
            Some(no_groups.as_slice()),
            Some(order.as_slice()),
            Some(0),
            Some(50),
        );
        let object = serde_json::to_value(&query).unwrap();

        assert_eq!(object["fields"], Value::Null);
        assert_eq!(object["joins"], Value::Null);
        assert_eq!(object["group_by"], Value::Null);
        assert_eq!(object["filters"], json!([filters[0].to_object().unwrap()]));
        assert_eq!(object["order"], json!([order[0].to_object().unwrap()]));
        assert_eq!(object["offset"], 0);
        assert_eq!(object["limit"], 50);
    }

    #[test]
    fn test_for_count_keeps_joins_and_filters_only() {
        let query = Query::builder()
            .select("codigo")
            .join(JoinClause::inner("tipo_cliente"))
            .filter(FilterClause::equals("codigo", "X"))
            .order_by(OrderByClause::asc("codigo"))
            .group_by("codigo")
            .offset(50)
            .limit(50)
            .build();
        let count = query.for_count();

        assert!(count.fields.is_none());
        assert!(count.order.is_none());
        assert!(count.group_by.is_none());
        assert!(count.offset.is_none());
        assert!(count.limit.is_none());
        assert_eq!(count.joins, query.joins);
        assert_eq!(count.filters, query.filters);
    }

    #[test]
    fn test_leading_operator_is_normalized() {
        let filters = vec![FilterClause::equals("codigo", "A").or()];
        let query = Query::from_parts(None, None, Some(filters.as_slice()), None, None, None, None);
        assert_eq!(query.filters.unwrap()[0].operator_type, OperatorType::And);
    }
}
