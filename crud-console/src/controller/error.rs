use thiserror::Error;

use crate::api::ApiError;
use crate::entity::EntityError;

/// Controller failures returned to the caller.
///
/// Precondition variants signal a controller-usage bug and are never turned into
/// notifications.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("the selected item cannot be empty")]
    NoSelectedItem,

    #[error("the item to delete cannot be empty")]
    NoItemToDelete,

    #[error("the selected item has no id to load")]
    MissingId,

    #[error("no modal at index {0}")]
    NoModal(usize),

    #[error("tab snapshot belongs to {found}, not {expected}")]
    SnapshotEntity {
        expected: &'static str,
        found: String,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}
