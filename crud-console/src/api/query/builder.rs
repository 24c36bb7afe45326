//! Fluent query builder

use super::{
    FieldClause, FilterClause, GroupByClause, JoinClause, OperatorType, OrderByClause, Query,
};

/// Fluent builder for [`Query`]
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    fields: Vec<FieldClause>,
    joins: Vec<JoinClause>,
    filters: Vec<FilterClause>,
    group_by: Vec<GroupByClause>,
    order: Vec<OrderByClause>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a plain field
    pub fn select(mut self, field_name: impl Into<String>) -> Self {
        self.fields.push(FieldClause::new(field_name));
        self
    }

    /// Select a prepared field clause
    pub fn field(mut self, field: FieldClause) -> Self {
        self.fields.push(field);
        self
    }

    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a filter, AND-combined with the previous one
    pub fn filter(mut self, filter: FilterClause) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter, OR-combined with the previous one.
    ///
    /// On an empty filter list this is the same as [`QueryBuilder::filter`].
    pub fn or_filter(mut self, filter: FilterClause) -> Self {
        let operator = if self.filters.is_empty() {
            OperatorType::And
        } else {
            OperatorType::Or
        };
        self.filters.push(filter.with_operator(operator));
        self
    }

    /// Add several filters, keeping their own operators
    pub fn filters(mut self, filters: impl IntoIterator<Item = FilterClause>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn group_by(mut self, field_name: impl Into<String>) -> Self {
        self.group_by.push(GroupByClause::new(field_name));
        self
    }

    pub fn order_by(mut self, order: OrderByClause) -> Self {
        self.order.push(order);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Query {
        Query::from_parts(
            Some(self.fields.as_slice()),
            Some(self.joins.as_slice()),
            Some(self.filters.as_slice()),
            Some(self.group_by.as_slice()),
            Some(self.order.as_slice()),
            self.offset,
            self.limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_chain() {
        let query = QueryBuilder::new()
            .or_filter(FilterClause::starts_with("codigo", "AB"))
            .or_filter(FilterClause::starts_with("descripcion", "AB"))
            .build();
        let filters = query.filters.unwrap();

        assert_eq!(filters[0].operator_type, OperatorType::And);
        assert_eq!(filters[1].operator_type, OperatorType::Or);
    }

    #[test]
    fn test_empty_builder_is_all_null() {
        let query = QueryBuilder::new().build();
        assert_eq!(query, Query::default());
    }
}
