//! Request shaping by effective view state

use serde_json::json;

use super::error::ControllerError;
use super::state::{ControllerState, ViewState};
use crate::api::RequestBody;
use crate::api::query::Query;
use crate::entity::{Entity, Identifiable, JsonConvertible};

/// Build the request body for the effective view state.
///
/// `view_state` overrides the controller's own state without changing it. EDIT/DETAIL send
/// the selected item, DELETE the item to delete, LIST/VALIDATE the given query. The entity
/// defaults to the controller's target.
pub fn request_body_for_view_state<E: Entity>(
    state: &ControllerState<E>,
    view_state: Option<ViewState>,
    query: &Query,
    target_entity: Option<&str>,
) -> Result<RequestBody, ControllerError> {
    let entity = target_entity.unwrap_or(&state.target_entity);

    let request_object = match view_state.unwrap_or(state.view_state) {
        ViewState::Edit | ViewState::Detail => state
            .selected_item
            .as_ref()
            .ok_or(ControllerError::NoSelectedItem)?
            .to_json_dict(),
        ViewState::Delete => state
            .item_to_delete
            .as_ref()
            .ok_or(ControllerError::NoItemToDelete)?
            .to_json_dict(),
        ViewState::List | ViewState::Validate => serde_json::to_value(query)?,
    };

    Ok(RequestBody::new(entity, request_object))
}

/// `{entity, request_object: {entity_id}}` for loading the selected item
pub fn load_request_body<E: Entity>(
    state: &ControllerState<E>,
) -> Result<RequestBody, ControllerError> {
    let selected = state
        .selected_item
        .as_ref()
        .ok_or(ControllerError::NoSelectedItem)?;
    let id = selected.id().ok_or(ControllerError::MissingId)?;

    Ok(RequestBody::new(
        state.target_entity.clone(),
        json!({ "entity_id": id }),
    ))
}
