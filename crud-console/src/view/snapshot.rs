//! Persistable tab state

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::header::DataTableHeader;
use crate::controller::{QueryState, ViewState};

/// What a tab needs to come back where it was left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub entity: String,
    pub clauses: QueryState,
    pub headers: Vec<DataTableHeader>,
    pub selected_item: Option<Value>,
    pub item_to_delete: Option<Value>,
    pub row_limit: u64,
    pub view_state: ViewState,
    pub last_focus_element: Option<String>,
}

impl TabSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(serialized: &str) -> serde_json::Result<Self> {
        serde_json::from_str(serialized)
    }
}
