//! View-only state layered on top of the controller state

use uuid::Uuid;

use super::header::DataTableHeader;
use super::modal::ModalStack;
use crate::controller::ViewState;

#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Prefix of every element id the view owns
    pub controller_id: String,
    pub title: String,
    /// Container the view renders into; the first modal attaches here
    pub parent_container: String,
    pub headers: Vec<DataTableHeader>,
    pub modals: ModalStack,
    /// One-shot focus target, consumed by [`ViewModel::take_focus`]
    pub last_focus_element: Option<String>,
    /// Editable fields of the form, in tab order
    pub form_inputs: Vec<&'static str>,
    /// Views opened inside a modal are never persisted
    pub is_modal: bool,
}

impl ViewModel {
    pub fn new(title: impl Into<String>, parent_container: impl Into<String>) -> Self {
        Self {
            controller_id: Uuid::new_v4().to_string(),
            title: title.into(),
            parent_container: parent_container.into(),
            headers: Vec::new(),
            modals: ModalStack::new(),
            last_focus_element: None,
            form_inputs: Vec::new(),
            is_modal: false,
        }
    }

    pub fn input_id(&self, field: &str) -> String {
        format!("{}_{}", self.controller_id, field)
    }

    pub fn header_mut(&mut self, field_name: &str) -> Option<&mut DataTableHeader> {
        self.headers
            .iter_mut()
            .find(|header| header.field_name == field_name)
    }

    /// Element to focus after the next render.
    ///
    /// The explicit target wins and is cleared. Otherwise the topmost modal's first control,
    /// otherwise the form's first input while editing.
    pub fn take_focus(&mut self, view_state: ViewState) -> Option<String> {
        if let Some(target) = self.last_focus_element.take() {
            return Some(target);
        }
        if let Some(modal) = self.modals.top() {
            return Some(modal.first_focusable());
        }
        match view_state {
            ViewState::Edit => self.form_inputs.first().map(|field| self.input_id(field)),
            _ => None,
        }
    }
}
