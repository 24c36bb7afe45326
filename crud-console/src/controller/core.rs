//! Core controller runtime
//!
//! Owns one [`ControllerState`] and drives it: messages go through the reducer, the
//! commands it returns are executed against the gateway, and call outcomes re-enter the
//! reducer as messages. `&mut self` on every entry point keeps calls on one controller
//! strictly sequential.

use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use super::command::Command;
use super::error::ControllerError;
use super::msg::Msg;
use super::notify::{Notification, Notifier};
use super::request::request_body_for_view_state;
use super::state::{ControllerState, ViewState};
use super::update::{count_of, update};
use crate::api::constants::SUGGESTION_LIMIT;
use crate::api::query::{FieldClause, FilterClause, Query};
use crate::api::{ApiClient, ApiError, Operation};
use crate::entity::{Entity, FieldValue};

pub struct CoreController<E: Entity> {
    state: ControllerState<E>,
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    suggestion_limit: u64,
}

impl<E: Entity> CoreController<E> {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: ControllerState::default(),
            client,
            notifier,
            suggestion_limit: SUGGESTION_LIMIT,
        }
    }

    pub fn with_state(mut self, state: ControllerState<E>) -> Self {
        self.state = state;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: u64) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn state(&self) -> &ControllerState<E> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ControllerState<E> {
        &mut self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(&notification);
    }

    /// Run one message through the reducer and execute everything it leads to
    pub async fn dispatch(&mut self, msg: Msg<E>) -> Result<(), ControllerError> {
        self.execute(Command::Dispatch(msg)).await
    }

    /// Execute a command tree depth first, in order
    pub async fn execute(&mut self, command: Command<E>) -> Result<(), ControllerError> {
        let mut pending = VecDeque::from([command]);

        while let Some(command) = pending.pop_front() {
            match command {
                Command::None => {}
                Command::Notify(notification) => self.notifier.notify(&notification),
                Command::Dispatch(msg) => {
                    let next = update(&mut self.state, msg)?;
                    pending.push_front(next);
                }
                Command::Call {
                    operation,
                    blocking,
                    then,
                } => {
                    let result = self.client.make_request(&operation, blocking).await;
                    let next = update(&mut self.state, then(result))?;
                    pending.push_front(next);
                }
                Command::Batch(commands) => {
                    for command in commands.into_iter().rev() {
                        pending.push_front(command);
                    }
                }
            }
        }

        Ok(())
    }

    /// Fetch the current page into `items`
    pub async fn fetch_data(
        &mut self,
        new_view_state: Option<ViewState>,
    ) -> Result<(), ControllerError> {
        self.dispatch(Msg::FetchData { new_view_state }).await
    }

    /// Create or update the selected item
    pub async fn save_changes(&mut self) -> Result<(), ControllerError> {
        self.dispatch(Msg::SaveChanges).await
    }

    pub async fn delete_item(&mut self, item: E) -> Result<(), ControllerError> {
        self.dispatch(Msg::DeleteItem(item)).await
    }

    /// Select `item` right away, then replace it with the full record
    pub async fn load_item(
        &mut self,
        item: E,
        new_state: Option<ViewState>,
    ) -> Result<(), ControllerError> {
        self.dispatch(Msg::LoadItem { item, new_state }).await
    }

    /// Refresh `row_number`, notifying on failure
    pub async fn refresh_row_count(&mut self) -> Result<(), ControllerError> {
        self.dispatch(Msg::CountRows).await
    }

    /// Count rows matching the controller's joins and filters. Failures are returned.
    pub async fn count_rows_by_controller_clauses(&self) -> Result<u64, ControllerError> {
        let query = self.state.clauses.count_query();
        self.count_rows(&query, true).await
    }

    pub(crate) async fn count_rows(
        &self,
        query: &Query,
        blocking: bool,
    ) -> Result<u64, ControllerError> {
        let body =
            request_body_for_view_state(&self.state, Some(ViewState::Validate), query, None)?;
        let payload = self
            .client
            .make_request(&Operation::Count(body), blocking)
            .await?;

        count_of(&payload).ok_or_else(|| {
            ControllerError::Api(ApiError::MalformedEnvelope(format!(
                "count is not a number: {}",
                payload
            )))
        })
    }

    /// Type-ahead lookup.
    ///
    /// Filters are STARTS_WITH on each of `filter_fields`, ORed after the first. The id field
    /// is always selected. Keys outside the selection are stripped from every row. Never
    /// fails: errors are notified and yield an empty list.
    pub async fn suggest_entities(
        &self,
        input_text: &str,
        filter_fields: &[&str],
        select_fields: &[&str],
        id_field_name: &str,
        target_entity: &str,
    ) -> Vec<Map<String, Value>> {
        let mut builder = Query::builder().field(FieldClause::new(id_field_name));
        for field in select_fields {
            builder = builder.field(FieldClause::new(*field));
        }
        for field in filter_fields {
            builder = builder.or_filter(FilterClause::starts_with(*field, input_text));
        }
        let query = builder.offset(0).limit(self.suggestion_limit).build();

        let selected: HashSet<String> = query
            .selected_field_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let body = match request_body_for_view_state(
            &self.state,
            Some(ViewState::List),
            &query,
            Some(target_entity),
        ) {
            Ok(body) => body,
            Err(e) => {
                warn!("Suggestion request could not be built: {}", e);
                return Vec::new();
            }
        };

        match self
            .client
            .make_request(&Operation::Select(body), false)
            .await
        {
            Ok(Value::Array(rows)) => {
                let suggestions: Vec<Map<String, Value>> = rows
                    .into_iter()
                    .filter_map(|row| match row {
                        Value::Object(mut row) => {
                            row.retain(|key, _| selected.contains(key));
                            Some(row)
                        }
                        _ => None,
                    })
                    .collect();
                debug!(
                    "{} suggestions for '{}' in {}",
                    suggestions.len(),
                    input_text,
                    target_entity
                );
                suggestions
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                self.notify(Notification::error(e.user_message()));
                Vec::new()
            }
        }
    }

    /// Assign a value to a field of the selected item
    pub fn assign_field(&mut self, field: &str, value: FieldValue) -> Result<(), ControllerError> {
        let selected = self
            .state
            .selected_item
            .as_mut()
            .ok_or(ControllerError::NoSelectedItem)?;
        selected.set_field(field, value)?;
        Ok(())
    }

    /// Parse operator input for a field of the selected item and assign it
    pub fn assign_input(&mut self, field: &str, input: &str) -> Result<(), ControllerError> {
        let descriptor = E::descriptor(field).ok_or_else(|| E::unknown_field(field))?;
        let value = FieldValue::parse_input(field, descriptor.kind, input)?;
        self.assign_field(field, value)
    }
}
