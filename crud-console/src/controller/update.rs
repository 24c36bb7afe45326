//! Core reducer
//!
//! Pure transitions from (state, message) to state plus the command to run next. Network
//! and application failures become error notifications and leave data state untouched;
//! precondition violations are returned as errors.

use log::{debug, warn};
use serde_json::Value;

use super::command::Command;
use super::error::ControllerError;
use super::msg::Msg;
use super::notify::Notification;
use super::request::{load_request_body, request_body_for_view_state};
use super::state::{ControllerState, ViewState};
use crate::api::Operation;
use crate::entity::{Entity, EntityError, Identifiable, JsonConvertible, Validatable};

pub fn update<E: Entity>(
    state: &mut ControllerState<E>,
    msg: Msg<E>,
) -> Result<Command<E>, ControllerError> {
    match msg {
        // === Requests ===
        Msg::FetchData { new_view_state } => {
            let query = state.list_query();
            let body =
                request_body_for_view_state(state, Some(ViewState::List), &query, None)?;
            Ok(Command::call(Operation::Select(body), move |result| {
                Msg::DataFetched {
                    result,
                    new_view_state,
                }
            }))
        }

        Msg::SaveChanges => {
            let selected = state
                .selected_item
                .as_mut()
                .ok_or(ControllerError::NoSelectedItem)?;

            let swept = selected.sweep_stale_errors();
            if !swept.is_empty() {
                debug!("Dropped stale form errors: {:?}", swept);
            }
            if selected.has_form_errors() {
                let fields: Vec<&str> = selected
                    .meta()
                    .form_errors
                    .iter()
                    .map(|(field, _)| field.as_str())
                    .collect();
                return Ok(Command::notify(Notification::error(format!(
                    "Fix the invalid fields before saving: {}",
                    fields.join(", ")
                ))));
            }

            let is_update = selected.id().is_some();
            let body = request_body_for_view_state(
                state,
                Some(ViewState::Edit),
                &Default::default(),
                None,
            )?;
            let operation = if is_update {
                Operation::Update(body)
            } else {
                Operation::Create(body)
            };
            Ok(Command::call(operation, Msg::Saved))
        }

        Msg::DeleteItem(item) => {
            state.item_to_delete = Some(item);
            let body = request_body_for_view_state(
                state,
                Some(ViewState::Delete),
                &Default::default(),
                None,
            )?;
            Ok(Command::call(Operation::Delete(body), Msg::Deleted))
        }

        Msg::LoadItem { item, new_state } => {
            state.selected_item = Some(item);
            let body = match load_request_body(state) {
                Ok(body) => body,
                Err(e) => {
                    state.selected_item = None;
                    return Err(e);
                }
            };
            Ok(Command::call(Operation::Load(body), move |result| {
                Msg::Loaded { result, new_state }
            }))
        }

        Msg::CountRows => {
            let query = state.clauses.count_query();
            let body =
                request_body_for_view_state(state, Some(ViewState::Validate), &query, None)?;
            Ok(Command::call(Operation::Count(body), Msg::RowsCounted))
        }

        // === Responses ===
        Msg::DataFetched {
            result,
            new_view_state,
        } => Ok(match result.map_err(|e| e.user_message()) {
            Ok(payload) => match entity_list::<E>(payload) {
                Ok(items) => {
                    debug!("Fetched {} {} rows", items.len(), state.target_entity);
                    state.items = items;
                    if let Some(view_state) = new_view_state {
                        state.view_state = view_state;
                    }
                    Command::None
                }
                Err(e) => Command::notify(Notification::error(e.to_string())),
            },
            Err(message) => Command::notify(Notification::error(message)),
        }),

        Msg::Saved(result) => Ok(match result {
            Ok(payload) => {
                let message = match &payload {
                    Value::String(message) => message.clone(),
                    _ => "Saved".to_string(),
                };
                // Some endpoints answer with the stored record; keep it so the new id sticks
                let mut rejected = None;
                if payload.is_object() {
                    match E::from_json_value(payload) {
                        Ok(saved) => state.selected_item = Some(saved),
                        Err(e) => {
                            warn!("Could not read the saved {}: {}", E::ENTITY_NAME, e);
                            rejected = Some(Notification::error(format!(
                                "The saved record could not be read back: {}",
                                e
                            )));
                        }
                    }
                }
                state.view_state = ViewState::Detail;
                match rejected {
                    Some(error) => Command::batch([
                        Command::notify(Notification::success(message)),
                        Command::notify(error),
                    ]),
                    None => Command::notify(Notification::success(message)),
                }
            }
            Err(e) => Command::notify(Notification::error(e.user_message())),
        }),

        Msg::Deleted(result) => Ok(match result {
            Ok(payload) => {
                state.item_to_delete = None;
                let message = match payload {
                    Value::String(message) => message,
                    _ => "Deleted".to_string(),
                };
                Command::batch([
                    Command::notify(Notification::success(message)),
                    Command::Dispatch(Msg::FetchData {
                        new_view_state: None,
                    }),
                ])
            }
            Err(e) => Command::notify(Notification::error(e.user_message())),
        }),

        Msg::Loaded { result, new_state } => {
            let loaded = result
                .map_err(|e| e.user_message())
                .and_then(|payload| E::from_json_value(payload).map_err(|e| e.to_string()));
            Ok(match loaded {
                Ok(item) => {
                    state.selected_item = Some(item);
                    if let Some(view_state) = new_state {
                        state.view_state = view_state;
                    }
                    Command::None
                }
                Err(message) => {
                    state.selected_item = None;
                    Command::notify(Notification::error(message))
                }
            })
        }

        Msg::RowsCounted(result) => Ok(match result.map_err(|e| e.user_message()) {
            Ok(payload) => match count_of(&payload) {
                Some(count) => {
                    state.row_number = count;
                    Command::None
                }
                None => Command::notify(Notification::error(format!(
                    "Unexpected count: {}",
                    payload
                ))),
            },
            Err(message) => Command::notify(Notification::error(message)),
        }),
    }
}

/// Convert a select payload into entities, all or nothing
pub fn entity_list<E: Entity>(payload: Value) -> Result<Vec<E>, EntityError> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(rows) => rows.into_iter().map(E::from_json_value).collect(),
        other => Err(EntityError::InvalidJson {
            entity: E::ENTITY_NAME,
            message: format!("expected a list of rows, got {}", other),
        }),
    }
}

/// Read a count payload
pub fn count_of(payload: &Value) -> Option<u64> {
    payload
        .as_u64()
        .or_else(|| payload.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}
