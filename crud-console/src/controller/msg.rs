//! Messages handled by the core reducer

use serde_json::Value;

use super::state::ViewState;
use crate::api::ApiError;
use crate::entity::Entity;

/// Outcome of one gateway call
pub type CallResult = Result<Value, ApiError>;

#[derive(Debug)]
pub enum Msg<E: Entity> {
    // === Requests ===
    /// Fetch the current page, optionally switching state once it arrives
    FetchData { new_view_state: Option<ViewState> },
    /// Create or update the selected item
    SaveChanges,
    /// Delete the given row
    DeleteItem(E),
    /// Select a (possibly partial) row and load the full record
    LoadItem { item: E, new_state: Option<ViewState> },
    /// Refresh the total row count for pagination
    CountRows,

    // === Responses ===
    DataFetched {
        result: CallResult,
        new_view_state: Option<ViewState>,
    },
    Saved(CallResult),
    Deleted(CallResult),
    Loaded {
        result: CallResult,
        new_state: Option<ViewState>,
    },
    RowsCounted(CallResult),
}
