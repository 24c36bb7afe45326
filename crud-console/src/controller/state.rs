//! Controller runtime state

use serde::{Deserialize, Serialize};

use crate::api::query::{FieldClause, FilterClause, GroupByClause, JoinClause, OrderByClause, Query};
use crate::entity::Entity;

/// Default page size of list views
pub const DEFAULT_ROW_LIMIT: u64 = 50;

/// Controller mode.
///
/// `Delete` and `Validate` only ever shape a request; they are never a resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewState {
    #[default]
    List,
    Edit,
    Detail,
    Delete,
    Validate,
}

impl ViewState {
    /// States a controller may rest in
    pub fn is_resting(&self) -> bool {
        matches!(self, ViewState::List | ViewState::Edit | ViewState::Detail)
    }
}

/// Current clause lists; `None` means "unset"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub fields: Option<Vec<FieldClause>>,
    pub joins: Option<Vec<JoinClause>>,
    pub filters: Option<Vec<FilterClause>>,
    pub group_by: Option<Vec<GroupByClause>>,
    pub order: Option<Vec<OrderByClause>>,
}

impl QueryState {
    /// Query for the list, paged
    pub fn list_query(&self, offset: u64, limit: u64) -> Query {
        Query::from_parts(
            self.fields.as_deref(),
            self.joins.as_deref(),
            self.filters.as_deref(),
            self.group_by.as_deref(),
            self.order.as_deref(),
            Some(offset),
            Some(limit),
        )
    }

    /// Query for counting rows: joins and filters only
    pub fn count_query(&self) -> Query {
        Query::from_parts(
            None,
            self.joins.as_deref(),
            self.filters.as_deref(),
            None,
            None,
            None,
            None,
        )
    }

    pub fn order_for(&self, field_name: &str) -> Option<&OrderByClause> {
        self.order
            .iter()
            .flatten()
            .find(|clause| clause.field_name == field_name)
    }
}

/// Everything one controller instance owns
#[derive(Debug, Clone)]
pub struct ControllerState<E: Entity> {
    /// Entity name requests are addressed to
    pub target_entity: String,
    pub view_state: ViewState,
    pub items: Vec<E>,
    pub selected_item: Option<E>,
    pub item_to_delete: Option<E>,
    /// Row waiting for a delete confirmation
    pub pending_delete: Option<E>,
    pub clauses: QueryState,
    pub row_offset: u64,
    pub row_limit: u64,
    /// Server-reported total of rows matching the current clauses
    pub row_number: u64,
}

impl<E: Entity> Default for ControllerState<E> {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_LIMIT)
    }
}

impl<E: Entity> ControllerState<E> {
    pub fn new(row_limit: u64) -> Self {
        Self {
            target_entity: E::ENTITY_NAME.to_string(),
            view_state: ViewState::List,
            items: Vec::new(),
            selected_item: None,
            item_to_delete: None,
            pending_delete: None,
            clauses: QueryState::default(),
            row_offset: 0,
            row_limit,
            row_number: 0,
        }
    }

    pub fn with_clauses(mut self, clauses: QueryState) -> Self {
        self.clauses = clauses;
        self
    }

    pub fn list_query(&self) -> Query {
        self.clauses.list_query(self.row_offset, self.row_limit)
    }

    pub fn is_in_detail_mode(&self) -> bool {
        self.view_state == ViewState::Detail
    }
}
