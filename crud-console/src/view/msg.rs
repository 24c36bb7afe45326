//! Messages handled by the view reducer

use super::modal::ModalKind;
use crate::entity::Entity;

#[derive(Debug)]
pub enum ViewMsg<E: Entity> {
    // === Sorting ===
    /// Cycle a column through ascending, descending and unsorted
    ToggleOrder(String),
    /// Drop every sort clause
    RestartOrder,

    // === Paging ===
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,

    // === Modals ===
    AddModal {
        title: String,
        kind: ModalKind,
        width: Option<String>,
    },
    RemoveModal(usize),
    RemoveLastModal,
    /// Ask for confirmation before deleting a row
    ConfirmDeleteItem(E),
    /// Confirmation accepted
    ConfirmDelete,
    /// Confirmation dismissed
    CancelDelete,

    // === Navigation ===
    PrepareDetail(E),
    PrepareEdit(E),
    GoToCreateView,
    /// Back to the list with a fresh count and fetch
    GoToList,

    // === Focus ===
    SetFocus(String),
}
