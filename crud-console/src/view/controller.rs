//! View controller
//!
//! Composes a [`CoreController`] with the view model of one tab or modal: its headers,
//! modal stack and focus. View messages go through the view reducer first; whatever they
//! hand on runs on the core runtime.

use log::{debug, info};
use serde_json::{Map, Value};

use super::definitions::{EntityView, ViewDefinition};
use super::header::OrderState;
use super::modal::ModalKind;
use super::msg::ViewMsg;
use super::pagination::Pagination;
use super::snapshot::TabSnapshot;
use super::state::ViewModel;
use super::update::update;
use crate::api::query::{FilterClause, OrderByClause};
use crate::controller::{ControllerError, CoreController, ControllerState, ViewState};
use crate::entity::{FieldValue, JsonConvertible};

pub struct ViewController<E: EntityView> {
    core: CoreController<E>,
    view: ViewModel,
    definition: ViewDefinition,
}

impl<E: EntityView> ViewController<E> {
    /// Controller rendered into `parent_container`, set up from the entity's definition
    pub fn new(mut core: CoreController<E>, parent_container: impl Into<String>) -> Self {
        let definition = E::definition();
        let row_limit = core.state().row_limit;
        *core.state_mut() =
            ControllerState::new(row_limit).with_clauses(definition.query_state());

        let mut view = ViewModel::new(definition.title, parent_container);
        view.headers = definition.headers.clone();
        view.form_inputs = definition.form_inputs.clone();

        Self {
            core,
            view,
            definition,
        }
    }

    /// Controller living inside a modal; never persisted
    pub fn modal(core: CoreController<E>, parent_container: impl Into<String>) -> Self {
        let mut controller = Self::new(core, parent_container);
        controller.view.is_modal = true;
        controller
    }

    pub fn core(&self) -> &CoreController<E> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreController<E> {
        &mut self.core
    }

    pub fn state(&self) -> &ControllerState<E> {
        self.core.state()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn definition(&self) -> &ViewDefinition {
        &self.definition
    }

    pub fn pagination(&self) -> Pagination {
        let state = self.core.state();
        Pagination::new(state.row_offset, state.row_limit, state.row_number)
    }

    pub async fn dispatch(&mut self, msg: ViewMsg<E>) -> Result<(), ControllerError> {
        let command = update(self.core.state_mut(), &mut self.view, msg)?;
        self.core.execute(command).await
    }

    // === Sorting and paging ===

    pub async fn toggle_order(&mut self, field_name: &str) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::ToggleOrder(field_name.to_string()))
            .await
    }

    pub async fn restart_order(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::RestartOrder).await
    }

    pub async fn first_page(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::FirstPage).await
    }

    pub async fn previous_page(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::PreviousPage).await
    }

    pub async fn next_page(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::NextPage).await
    }

    pub async fn last_page(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::LastPage).await
    }

    /// Jump to a 1-based page, clamped to the pages available
    pub async fn go_to_page(&mut self, page: u64) -> Result<(), ControllerError> {
        let pagination = self.pagination();
        let offset = page.saturating_sub(1).saturating_mul(pagination.limit);
        self.core.state_mut().row_offset = offset.min(pagination.last_page_offset());
        self.core.fetch_data(None).await
    }

    /// Replace the sort without fetching; headers follow the new clauses
    pub fn set_order(&mut self, clauses: Vec<OrderByClause>) {
        // One clause per field, the last one given wins
        let mut order: Vec<OrderByClause> = Vec::with_capacity(clauses.len());
        for clause in clauses {
            order.retain(|kept| kept.field_name != clause.field_name);
            order.push(clause);
        }
        for header in self.view.headers.iter_mut() {
            header.order_state = order
                .iter()
                .find(|clause| clause.field_name == header.field_name)
                .map(|clause| OrderState::from(clause.order_by_type));
        }
        self.core.state_mut().clauses.order = (!order.is_empty()).then_some(order);
    }

    /// Replace the list filters and start again from the first page
    pub fn set_filters(&mut self, filters: Vec<FilterClause>) {
        let state = self.core.state_mut();
        state.clauses.filters = (!filters.is_empty()).then_some(filters);
        state.row_offset = 0;
    }

    // === Navigation ===

    pub async fn go_to_list(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::GoToList).await
    }

    pub async fn go_to_create_view(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::GoToCreateView).await
    }

    pub async fn prepare_detail(&mut self, item: E) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::PrepareDetail(item)).await
    }

    pub async fn prepare_edit(&mut self, item: E) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::PrepareEdit(item)).await
    }

    /// Load the full record of a row and show it in detail
    pub async fn open_detail(&mut self, item: E) -> Result<(), ControllerError> {
        self.core.load_item(item, Some(ViewState::Detail)).await
    }

    /// Load the full record of a row and open it for editing
    pub async fn open_edit(&mut self, item: E) -> Result<(), ControllerError> {
        self.core.load_item(item, Some(ViewState::Edit)).await
    }

    // === Modals ===

    pub async fn add_modal(
        &mut self,
        title: impl Into<String>,
        kind: ModalKind,
        width: Option<String>,
    ) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::AddModal {
            title: title.into(),
            kind,
            width,
        })
        .await
    }

    pub async fn remove_modal(&mut self, index: usize) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::RemoveModal(index)).await
    }

    pub async fn remove_last_modal(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::RemoveLastModal).await
    }

    pub async fn confirm_delete_item(&mut self, item: E) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::ConfirmDeleteItem(item)).await
    }

    pub async fn confirm_delete(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::ConfirmDelete).await
    }

    pub async fn cancel_delete(&mut self) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::CancelDelete).await
    }

    // === Forms ===

    /// Assign operator input to a field of the selected item
    pub fn assign_input(&mut self, field: &str, input: &str) -> Result<(), ControllerError> {
        self.core.assign_input(field, input)
    }

    /// Run the field's configured validators; fields without any pass
    pub async fn validate_input(&mut self, field: &str) -> Result<bool, ControllerError> {
        let validators = self.definition.validators_for(field).to_vec();
        if validators.is_empty() {
            return Ok(true);
        }
        self.core.validate_field(field, &validators).await
    }

    /// Validate every field that has validators, reporting whether all passed
    pub async fn validate_form(&mut self) -> Result<bool, ControllerError> {
        let fields: Vec<&'static str> = self
            .definition
            .validators
            .iter()
            .map(|(field, _)| *field)
            .collect();

        let mut all_valid = true;
        for field in fields {
            all_valid &= self.validate_input(field).await?;
        }
        Ok(all_valid)
    }

    pub async fn save_changes(&mut self) -> Result<(), ControllerError> {
        self.core.save_changes().await
    }

    // === Lookups ===

    /// Type-ahead suggestions for an entity-valued field; empty when it has no lookup
    pub async fn suggest(&self, field: &str, input_text: &str) -> Vec<Map<String, Value>> {
        let Some(lookup) = self.definition.lookup(field) else {
            debug!("{} has no lookup configured", field);
            return Vec::new();
        };
        self.core
            .suggest_entities(
                input_text,
                &lookup.filter_fields,
                &lookup.select_fields,
                lookup.id_field,
                lookup.target_entity,
            )
            .await
    }

    /// Open the lookup modal of an entity-valued field
    pub async fn open_lookup(&mut self, field: &str) -> Result<(), ControllerError> {
        let Some(lookup) = self.definition.lookup(field).cloned() else {
            return Err(E::unknown_field(field).into());
        };
        self.add_modal(
            lookup.target_entity,
            ModalKind::Lookup {
                entity: lookup.target_entity.to_string(),
            },
            Some(lookup.modal_width.to_string()),
        )
        .await
    }

    /// Store a picked record on the selected item and move focus back to its input.
    ///
    /// Closes the lookup modal when one is open.
    pub fn select_lookup(
        &mut self,
        field: &str,
        record: Map<String, Value>,
    ) -> Result<(), ControllerError> {
        let focus_input = self
            .definition
            .lookup(field)
            .map_or(field, |lookup| lookup.focus_input);
        let focus = self.view.input_id(focus_input);

        self.core
            .assign_field(field, FieldValue::Entity(Value::Object(record)))?;

        if matches!(
            self.view.modals.top().map(|modal| &modal.kind),
            Some(ModalKind::Lookup { .. })
        ) {
            self.view.modals.remove_last();
        }
        self.view.last_focus_element = Some(focus);
        Ok(())
    }

    // === Focus ===

    pub async fn set_focus(&mut self, element_id: impl Into<String>) -> Result<(), ControllerError> {
        self.dispatch(ViewMsg::SetFocus(element_id.into())).await
    }

    /// Element to focus after rendering; an explicit target is used once
    pub fn take_focus(&mut self) -> Option<String> {
        let view_state = self.core.state().view_state;
        self.view.take_focus(view_state)
    }

    // === Persistence ===

    /// State worth restoring later; `None` for modal controllers
    pub fn snapshot(&self) -> Option<TabSnapshot> {
        if self.view.is_modal {
            return None;
        }
        let state = self.core.state();
        Some(TabSnapshot {
            entity: E::ENTITY_NAME.to_string(),
            clauses: state.clauses.clone(),
            headers: self.view.headers.clone(),
            selected_item: state.selected_item.as_ref().map(|item| item.to_json_dict()),
            item_to_delete: state.item_to_delete.as_ref().map(|item| item.to_json_dict()),
            row_limit: state.row_limit,
            view_state: state.view_state,
            last_focus_element: self.view.last_focus_element.clone(),
        })
    }

    /// Bring back a saved tab. Non-resting states come back as the list.
    pub fn restore(&mut self, snapshot: TabSnapshot) -> Result<(), ControllerError> {
        if snapshot.entity != E::ENTITY_NAME {
            return Err(ControllerError::SnapshotEntity {
                expected: E::ENTITY_NAME,
                found: snapshot.entity,
            });
        }

        let selected_item = snapshot.selected_item.map(E::from_json_value).transpose()?;
        let item_to_delete = snapshot.item_to_delete.map(E::from_json_value).transpose()?;

        let state = self.core.state_mut();
        state.clauses = snapshot.clauses;
        state.selected_item = selected_item;
        state.item_to_delete = item_to_delete;
        state.row_limit = snapshot.row_limit;
        state.row_offset = 0;
        state.view_state = if snapshot.view_state.is_resting() {
            snapshot.view_state
        } else {
            ViewState::List
        };

        self.view.headers = snapshot.headers;
        self.view.last_focus_element = snapshot.last_focus_element;
        info!("Restored {} tab in {:?}", E::ENTITY_NAME, state.view_state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Notifier;
    use crate::models::{Cliente, TipoCliente};
    use crate::testing::{MockTransport, RecordingNotifier, logged_in_client};
    use serde_json::json;
    use std::sync::Arc;

    fn controller<E: EntityView>() -> (ViewController<E>, Arc<MockTransport>, Arc<RecordingNotifier>) {
        let (client, transport) = logged_in_client();
        let notifier = Arc::new(RecordingNotifier::new());
        let core = CoreController::new(client, notifier.clone() as Arc<dyn Notifier>);
        (ViewController::new(core, "tab-0"), transport, notifier)
    }

    #[tokio::test]
    async fn test_list_request_uses_definition() {
        let (mut controller, transport, _) = controller::<Cliente>();
        transport.push_flag(true, json!(1));
        transport.push_ok(json!([{"id": 1, "codigo": "C1", "nombre": "Ana", "tipo_cliente": {"codigo": "01"}}]));

        controller.go_to_list().await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].url, "http://api.test/count");
        assert_eq!(calls[1].url, "http://api.test/select");
        let body = calls[1].options.body_json().unwrap();
        assert_eq!(body["request_object"]["joins"][0]["join_type"], "INNER_JOIN");
        assert_eq!(body["request_object"]["fields"][3]["field_name"], "tipo_cliente.codigo");
        assert_eq!(controller.state().row_number, 1);
        assert_eq!(controller.state().items.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_order_refetches_with_order() {
        let (mut controller, transport, _) = controller::<TipoCliente>();
        transport.push_ok(json!([]));

        controller.toggle_order("descripcion").await.unwrap();

        let body = transport.calls()[0].options.body_json().unwrap();
        assert_eq!(body["request_object"]["order"][0]["field_name"], "descripcion");
        assert_eq!(body["request_object"]["order"][0]["order_by_type"], "ASC");
        assert_eq!(controller.view().headers[1].order_state, Some(OrderState::Up));
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let (mut controller, transport, notifier) = controller::<TipoCliente>();
        transport.push_ok(json!("Deleted"));
        transport.push_ok(json!([]));

        controller
            .confirm_delete_item(TipoCliente::new(Some(9), "09", ""))
            .await
            .unwrap();
        assert!(transport.calls().is_empty());
        assert!(controller.take_focus().unwrap().ends_with("_yes"));

        controller.confirm_delete().await.unwrap();
        assert_eq!(transport.calls().len(), 2);
        assert!(controller.view().modals.is_empty());
        assert_eq!(notifier.messages(), vec!["Deleted".to_string()]);
    }

    #[tokio::test]
    async fn test_go_to_page_is_clamped() {
        let (mut controller, transport, _) = controller::<TipoCliente>();
        controller.core_mut().state_mut().row_number = 97;
        transport.push_ok(json!([]));

        controller.go_to_page(7).await.unwrap();
        assert_eq!(controller.state().row_offset, 50);
        let body = transport.calls()[0].options.body_json().unwrap();
        assert_eq!(body["request_object"]["offset"], 50);
    }

    #[test]
    fn test_set_order_updates_headers() {
        let (mut controller, _, _) = controller::<TipoCliente>();
        controller.set_order(vec![OrderByClause::desc("descripcion")]);
        assert_eq!(controller.view().headers[1].order_state, Some(OrderState::Down));
        assert_eq!(controller.view().headers[0].order_state, None);

        controller.set_order(Vec::new());
        assert_eq!(controller.state().clauses.order, None);
        assert!(controller.view().headers.iter().all(|h| h.order_state.is_none()));
    }

    #[test]
    fn test_set_order_keeps_last_clause_per_field() {
        let (mut controller, _, _) = controller::<TipoCliente>();
        controller.set_order(vec![
            OrderByClause::asc("codigo"),
            OrderByClause::desc("descripcion"),
            OrderByClause::desc("codigo"),
        ]);

        assert_eq!(
            controller.state().clauses.order,
            Some(vec![OrderByClause::desc("descripcion"), OrderByClause::desc("codigo")])
        );
        assert_eq!(controller.view().headers[0].order_state, Some(OrderState::Down));
        assert_eq!(controller.view().headers[1].order_state, Some(OrderState::Down));
    }

    #[tokio::test]
    async fn test_lookup_pick_sets_field_and_focus() {
        let (mut controller, _, _) = controller::<Cliente>();
        controller.go_to_create_view().await.unwrap();
        controller.open_lookup("tipo_cliente").await.unwrap();
        assert_eq!(controller.view().modals.top().unwrap().width, "800px");

        let record = json!({"id": 3, "codigo": "03", "descripcion": "Mayorista"});
        controller
            .select_lookup("tipo_cliente", record.as_object().unwrap().clone())
            .unwrap();

        assert!(controller.view().modals.is_empty());
        let selected = controller.state().selected_item.clone().unwrap();
        assert_eq!(selected.tipo_cliente.unwrap().id, Some(3));
        let expected = format!("{}_tipoCliente", controller.view().controller_id);
        assert_eq!(controller.take_focus(), Some(expected));
    }

    #[tokio::test]
    async fn test_suggest_uses_lookup() {
        let (controller, transport, _) = controller::<Cliente>();
        transport.push_ok(json!([{"id": 3, "codigo": "03", "descripcion": "Mayorista"}]));

        let rows = controller.suggest("tipo_cliente", "0").await;
        assert_eq!(rows.len(), 1);
        assert!(controller.suggest("nombre", "0").await.is_empty());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_form_runs_configured_validators() {
        let (mut controller, transport, notifier) = controller::<TipoCliente>();
        controller.go_to_create_view().await.unwrap();
        controller.assign_input("codigo", "12a").unwrap();
        transport.push_flag(true, json!(0));

        assert!(!controller.validate_form().await.unwrap());
        assert!(controller.validate_input("descripcion").await.unwrap());
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_cliente_codigo_must_be_numeric() {
        let (mut controller, transport, notifier) = controller::<Cliente>();
        controller.go_to_create_view().await.unwrap();
        controller.assign_input("codigo", "12a").unwrap();
        transport.push_flag(true, json!(0));

        assert!(!controller.validate_form().await.unwrap());
        assert_eq!(notifier.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let (mut original, transport, _) = controller::<TipoCliente>();
        transport.push_ok(json!([]));
        original.toggle_order("codigo").await.unwrap();
        original
            .prepare_edit(TipoCliente::new(Some(2), "02", "Minorista"))
            .await
            .unwrap();
        original.set_focus("x_descripcion").await.unwrap();

        let snapshot = original.snapshot().unwrap();
        let serialized = snapshot.to_json().unwrap();

        let (mut restored, _, _) = controller::<TipoCliente>();
        restored
            .restore(TabSnapshot::from_json(&serialized).unwrap())
            .unwrap();

        assert_eq!(restored.state().view_state, ViewState::Edit);
        assert_eq!(restored.state().clauses, original.state().clauses);
        assert_eq!(restored.view().headers[0].order_state, Some(OrderState::Up));
        assert_eq!(
            restored.state().selected_item.as_ref().and_then(|i| i.codigo.clone()),
            Some("02".to_string())
        );
        assert_eq!(restored.take_focus().as_deref(), Some("x_descripcion"));
    }

    #[tokio::test]
    async fn test_modal_controllers_are_not_persisted() {
        let (client, _) = logged_in_client();
        let core = CoreController::<TipoCliente>::new(client, Arc::new(RecordingNotifier::new()));
        let controller = ViewController::modal(core, "modalPanel$$x");
        assert!(controller.snapshot().is_none());
    }

    #[test]
    fn test_restore_rejects_other_entity() {
        let (client, _) = logged_in_client();
        let core = CoreController::<Cliente>::new(client, Arc::new(RecordingNotifier::new()));
        let mut controller = ViewController::new(core, "tab-1");
        let snapshot = TabSnapshot {
            entity: "TipoCliente".into(),
            clauses: Default::default(),
            headers: Vec::new(),
            selected_item: None,
            item_to_delete: None,
            row_limit: 50,
            view_state: ViewState::Delete,
            last_focus_element: None,
        };
        assert!(matches!(
            controller.restore(snapshot),
            Err(ControllerError::SnapshotEntity { .. })
        ));
    }
}
