//! View reducer
//!
//! Sorting, paging, modals, navigation and focus. Anything that needs the gateway is
//! handed to the core reducer as a dispatched [`Msg`].

use log::debug;

use super::header::OrderState;
use super::modal::ModalKind;
use super::msg::ViewMsg;
use super::pagination::Pagination;
use super::state::ViewModel;
use crate::api::query::{OrderByClause, OrderByType};
use crate::controller::{Command, ControllerError, ControllerState, Msg, ViewState};
use crate::entity::Entity;

const CONFIRM_DELETE_TITLE: &str = "Delete record";

pub fn update<E: Entity>(
    state: &mut ControllerState<E>,
    view: &mut ViewModel,
    msg: ViewMsg<E>,
) -> Result<Command<E>, ControllerError> {
    match msg {
        // === Sorting ===
        ViewMsg::ToggleOrder(field_name) => {
            let next = toggle_order(state, &field_name);
            if let Some(header) = view.header_mut(&field_name) {
                header.order_state = next.map(OrderState::from);
            }
            debug!("Order of {} is now {:?}", field_name, next);
            Ok(fetch())
        }

        ViewMsg::RestartOrder => {
            state.clauses.order = None;
            for header in view.headers.iter_mut() {
                header.order_state = None;
            }
            Ok(fetch())
        }

        // === Paging ===
        ViewMsg::FirstPage => Ok(go_to_offset(state, Pagination::first)),
        ViewMsg::PreviousPage => Ok(go_to_offset(state, Pagination::previous)),
        ViewMsg::NextPage => Ok(go_to_offset(state, Pagination::next)),
        ViewMsg::LastPage => Ok(go_to_offset(state, Pagination::last)),

        // === Modals ===
        ViewMsg::AddModal { title, kind, width } => {
            let id = view
                .modals
                .push(&view.parent_container, title, kind, width.as_deref());
            debug!("Opened modal {}", id);
            Ok(Command::None)
        }

        ViewMsg::RemoveModal(index) => {
            view.modals
                .remove(index)
                .ok_or(ControllerError::NoModal(index))?;
            Ok(Command::None)
        }

        ViewMsg::RemoveLastModal => {
            view.modals.remove_last();
            Ok(Command::None)
        }

        ViewMsg::ConfirmDeleteItem(item) => {
            state.pending_delete = Some(item);
            view.modals.push(
                &view.parent_container,
                CONFIRM_DELETE_TITLE,
                ModalKind::ConfirmDelete,
                None,
            );
            Ok(Command::None)
        }

        ViewMsg::ConfirmDelete => {
            let item = state
                .pending_delete
                .take()
                .ok_or(ControllerError::NoItemToDelete)?;
            view.modals.remove_last();
            Ok(Command::Dispatch(Msg::DeleteItem(item)))
        }

        ViewMsg::CancelDelete => {
            state.pending_delete = None;
            view.modals.remove_last();
            Ok(Command::None)
        }

        // === Navigation ===
        ViewMsg::PrepareDetail(item) => {
            state.selected_item = Some(item);
            state.view_state = ViewState::Detail;
            Ok(Command::None)
        }

        ViewMsg::PrepareEdit(item) => {
            state.selected_item = Some(item);
            state.view_state = ViewState::Edit;
            Ok(Command::None)
        }

        ViewMsg::GoToCreateView => {
            state.selected_item = Some(E::new_for_create());
            state.view_state = ViewState::Edit;
            Ok(Command::None)
        }

        ViewMsg::GoToList => Ok(Command::batch([
            Command::Dispatch(Msg::CountRows),
            Command::Dispatch(Msg::FetchData {
                new_view_state: Some(ViewState::List),
            }),
        ])),

        // === Focus ===
        ViewMsg::SetFocus(element_id) => {
            view.last_focus_element = Some(element_id);
            Ok(Command::None)
        }
    }
}

fn fetch<E: Entity>() -> Command<E> {
    Command::Dispatch(Msg::FetchData {
        new_view_state: None,
    })
}

fn go_to_offset<E: Entity>(
    state: &mut ControllerState<E>,
    target: fn(&Pagination) -> u64,
) -> Command<E> {
    let pagination = Pagination::new(state.row_offset, state.row_limit, state.row_number);
    state.row_offset = target(&pagination);
    fetch()
}

/// Advance the sort of one field: unsorted, ascending, descending, unsorted.
///
/// Keeps at most one clause per field and returns the new direction.
fn toggle_order<E: Entity>(
    state: &mut ControllerState<E>,
    field_name: &str,
) -> Option<OrderByType> {
    let current = state
        .clauses
        .order_for(field_name)
        .map(|clause| clause.order_by_type);
    let order = state.clauses.order.get_or_insert_with(Vec::new);

    let next = match current {
        None => {
            order.push(OrderByClause::asc(field_name));
            Some(OrderByType::Asc)
        }
        Some(OrderByType::Asc) => {
            for clause in order.iter_mut().filter(|c| c.field_name == field_name) {
                clause.order_by_type = OrderByType::Desc;
            }
            Some(OrderByType::Desc)
        }
        Some(OrderByType::Desc) => {
            order.retain(|clause| clause.field_name != field_name);
            None
        }
    };

    if order.is_empty() {
        state.clauses.order = None;
    }
    next
}
