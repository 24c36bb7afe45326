//! Field validation pipeline
//!
//! Validators run in order and stop at the first failure. A failure is recorded in the
//! selected item's form errors and notified; a full pass clears the field's entry.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::core::CoreController;
use super::error::ControllerError;
use super::notify::Notification;
use crate::api::query::{FilterClause, Query};
use crate::entity::{Entity, FieldValue, Identifiable, Validatable};

static ONLY_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// The code must not already exist on another record
    Code {
        additional_filters: Vec<FilterClause>,
    },
    /// The value must be made of digits only
    OnlyNumbers,
}

impl Validator {
    pub fn code() -> Self {
        Validator::Code {
            additional_filters: Vec::new(),
        }
    }
}

/// `None` when `text` is made of digits only, the error message otherwise
pub fn string_is_only_numbers(text: &str) -> Option<String> {
    if ONLY_DIGITS.is_match(text) {
        None
    } else {
        Some("The value must contain only digits".to_string())
    }
}

impl<E: Entity> CoreController<E> {
    /// Validate one field of the selected item.
    ///
    /// Returns whether it passed. Fails when nothing is selected.
    pub async fn validate_field(
        &mut self,
        field_name: &str,
        validators: &[Validator],
    ) -> Result<bool, ControllerError> {
        let item = self
            .state()
            .selected_item
            .clone()
            .ok_or(ControllerError::NoSelectedItem)?;

        let mut failure = None;
        for validator in validators {
            failure = self.run_validator(&item, field_name, validator).await;
            if failure.is_some() {
                break;
            }
        }

        let selected = self
            .state_mut()
            .selected_item
            .as_mut()
            .ok_or(ControllerError::NoSelectedItem)?;

        match failure {
            Some(message) => {
                debug!("{} failed validation: {}", field_name, message);
                selected.record_error(field_name, message.clone());
                self.notify(Notification::error(message));
                Ok(false)
            }
            None => {
                selected.clear_error(field_name);
                Ok(true)
            }
        }
    }

    async fn run_validator(
        &self,
        item: &E,
        field_name: &str,
        validator: &Validator,
    ) -> Option<String> {
        match validator {
            Validator::Code { additional_filters } => {
                self.code_is_valid(item, Some(field_name), additional_filters)
                    .await
            }
            Validator::OnlyNumbers => {
                let value = item.get_field(field_name).unwrap_or(FieldValue::Null);
                string_is_only_numbers(&value.display())
            }
        }
    }

    /// Check that no other record already uses the item's code.
    ///
    /// Filters on EQUALS code, plus NOT_EQUALS id when the item is persisted, plus any
    /// additional filters, then counts. A failed count is notified and treated as valid.
    pub async fn code_is_valid(
        &self,
        item: &E,
        field_code_name: Option<&str>,
        additional_filters: &[FilterClause],
    ) -> Option<String> {
        let field_code_name = field_code_name.unwrap_or(E::code_field_name());
        let code = item.get_field(field_code_name).unwrap_or(FieldValue::Null);

        let mut filters = vec![FilterClause::equals(field_code_name, code.to_json())];
        if let Some(id) = item.id() {
            filters.push(FilterClause::not_equals(E::id_field_name(), id));
        }
        filters.extend(additional_filters.iter().cloned());

        let query = Query::builder().filters(filters).build();
        match self.count_rows(&query, true).await {
            Ok(count) if count > 0 => Some(format!("The code {} already exists", code.display())),
            Ok(_) => None,
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::ViewState;
    use crate::models::TipoCliente;
    use crate::testing::{RecordingNotifier, logged_in_client};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn controller_with(item: TipoCliente) -> (
        CoreController<TipoCliente>,
        Arc<crate::testing::MockTransport>,
        Arc<RecordingNotifier>,
    ) {
        let (client, transport) = logged_in_client();
        let notifier = Arc::new(RecordingNotifier::new());
        let mut controller = CoreController::new(client, notifier.clone());
        controller.state_mut().selected_item = Some(item);
        controller.state_mut().view_state = ViewState::Edit;
        (controller, transport, notifier)
    }

    #[test]
    fn test_only_numbers() {
        assert!(string_is_only_numbers("0123").is_none());
        assert!(string_is_only_numbers("12a").is_some());
        assert!(string_is_only_numbers("").is_some());
    }

    #[tokio::test]
    async fn test_new_code_counts_without_id_exclusion_then_creates() {
        let (mut controller, transport, _) = controller_with(TipoCliente::new(None, "AB12", "Nuevo"));
        transport.push_flag(true, json!(0));
        transport.push_ok(json!("Created"));

        assert!(controller.validate_field("codigo", &[Validator::code()]).await.unwrap());

        let count = transport.calls()[0].clone();
        assert_eq!(count.url, "http://api.test/count");
        let filters = count.options.body_json().unwrap()["request_object"]["filters"].clone();
        assert_eq!(filters.as_array().map(Vec::len), Some(1));
        assert_eq!(filters[0]["field_name"], "codigo");
        assert_eq!(filters[0]["filter_type"], "EQUALS");
        assert_eq!(filters[0]["object_to_compare"], "AB12");

        controller.save_changes().await.unwrap();
        assert_eq!(transport.calls()[1].url, "http://api.test/create");
        assert_eq!(controller.state().view_state, ViewState::Detail);
    }

    #[tokio::test]
    async fn test_existing_record_excludes_itself() {
        let (mut controller, transport, _) = controller_with(TipoCliente::new(Some(7), "AB12", "Viejo"));
        transport.push_flag(true, json!(0));

        assert!(controller.validate_field("codigo", &[Validator::code()]).await.unwrap());

        let body = transport.calls()[0].options.body_json().unwrap();
        let filters = &body["request_object"]["filters"];
        assert_eq!(filters[1]["field_name"], "id");
        assert_eq!(filters[1]["filter_type"], "NOT_EQUALS");
        assert_eq!(filters[1]["object_to_compare"], 7);
    }

    #[tokio::test]
    async fn test_conflict_records_error_and_short_circuits() {
        let (mut controller, transport, notifier) = controller_with(TipoCliente::new(None, "AB12", ""));
        transport.push_flag(true, json!(1));

        let valid = controller
            .validate_field("codigo", &[Validator::code(), Validator::OnlyNumbers])
            .await
            .unwrap();
        assert!(!valid);
        assert_eq!(transport.calls().len(), 1);

        let selected = controller.state().selected_item.as_ref().unwrap();
        let (message, value) = selected.meta().form_errors.get("codigo").unwrap().clone();
        assert_eq!(message, "The code AB12 already exists");
        assert_eq!(value, FieldValue::Text("AB12".into()));
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_passing_validation_clears_previous_error() {
        let (mut controller, _, _) = controller_with(TipoCliente::new(None, "12", ""));
        controller
            .state_mut()
            .selected_item
            .as_mut()
            .unwrap()
            .record_error("codigo", "old");

        assert!(controller.validate_field("codigo", &[Validator::OnlyNumbers]).await.unwrap());
        assert!(!controller.state().selected_item.as_ref().unwrap().has_form_errors());
    }

    #[tokio::test]
    async fn test_additional_filters_and_count_failure() {
        let (mut controller, transport, notifier) = controller_with(TipoCliente::new(None, "AB12", ""));
        transport.push_flag(false, json!("count failed"));

        let validator = Validator::Code {
            additional_filters: vec![FilterClause::equals("descripcion", Value::Null)],
        };
        assert!(controller.validate_field("codigo", &[validator]).await.unwrap());

        let body = transport.calls()[0].options.body_json().unwrap();
        assert_eq!(body["request_object"]["filters"][1]["field_name"], "descripcion");
        assert!(notifier.notifications()[0].is_error());
    }

    #[tokio::test]
    async fn test_validate_without_selection_fails_loudly() {
        let (client, _) = logged_in_client();
        let mut controller: CoreController<TipoCliente> =
            CoreController::new(client, Arc::new(RecordingNotifier::new()));
        assert!(matches!(
            controller.validate_field("codigo", &[Validator::OnlyNumbers]).await,
            Err(ControllerError::NoSelectedItem)
        ));
    }
}
