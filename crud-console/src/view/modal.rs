//! Modal stack
//!
//! Each modal attaches to the container of the modal below it, or to the owning view's
//! container for the first one, so nested modals stack on top of each other.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MODAL_ID_PREFIX: &str = "modalPanel$$";
pub const DEFAULT_MODAL_WIDTH: &str = "500px";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalKind {
    /// Yes/no confirmation before deleting the pending row
    ConfirmDelete,
    /// Nested list view used to pick a related record
    Lookup { entity: String },
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    pub id: String,
    pub title: String,
    pub parent_container: String,
    pub width: String,
    pub kind: ModalKind,
}

impl Modal {
    /// Element that takes focus when the modal opens
    pub fn first_focusable(&self) -> String {
        match self.kind {
            ModalKind::ConfirmDelete => format!("{}_yes", self.id),
            ModalKind::Lookup { .. } => format!("{}_filter", self.id),
            ModalKind::Message(_) => format!("{}_close", self.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalStack {
    modals: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a modal on top and return its id
    pub fn push(
        &mut self,
        root_container: &str,
        title: impl Into<String>,
        kind: ModalKind,
        width: Option<&str>,
    ) -> String {
        let id = format!("{}{}", MODAL_ID_PREFIX, Uuid::new_v4());
        let parent_container = self
            .modals
            .last()
            .map_or_else(|| root_container.to_string(), |top| top.id.clone());

        self.modals.push(Modal {
            id: id.clone(),
            title: title.into(),
            parent_container,
            width: width.unwrap_or(DEFAULT_MODAL_WIDTH).to_string(),
            kind,
        });
        id
    }

    /// Remove the modal at `index`, `None` when there is none
    pub fn remove(&mut self, index: usize) -> Option<Modal> {
        (index < self.modals.len()).then(|| self.modals.remove(index))
    }

    /// Pop the top modal only
    pub fn remove_last(&mut self) -> Option<Modal> {
        self.modals.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.modals.last()
    }

    pub fn len(&self) -> usize {
        self.modals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.modals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_modals_attach_to_previous() {
        let mut stack = ModalStack::new();
        let first = stack.push("tab-1", "Confirm", ModalKind::ConfirmDelete, None);
        let second = stack.push(
            "tab-1",
            "Customer types",
            ModalKind::Lookup {
                entity: "TipoCliente".into(),
            },
            Some("800px"),
        );

        assert!(first.starts_with("modalPanel$$"));
        let modals: Vec<&Modal> = stack.iter().collect();
        assert_eq!(modals[0].parent_container, "tab-1");
        assert_eq!(modals[0].width, "500px");
        assert_eq!(modals[1].parent_container, first);
        assert_eq!(modals[1].width, "800px");
        assert_eq!(stack.top().map(|m| m.id.clone()), Some(second));
    }

    #[test]
    fn test_remove_last_pops_top_only() {
        let mut stack = ModalStack::new();
        stack.push("root", "a", ModalKind::Message("a".into()), None);
        stack.push("root", "b", ModalKind::Message("b".into()), None);

        assert_eq!(stack.remove_last().map(|m| m.title), Some("b".to_string()));
        assert_eq!(stack.len(), 1);
        assert!(stack.remove(5).is_none());
        assert!(stack.remove(0).is_some());
        assert!(stack.remove_last().is_none());
    }
}
