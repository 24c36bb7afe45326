//! View Controller
//!
//! Composition layer over the core controller: table headers and sorting, pagination, a
//! modal stack, navigation between list and form, focus, and tab snapshots. Each entity
//! describes its list and form through [`EntityView`].

pub mod controller;
pub mod definitions;
pub mod header;
pub mod modal;
pub mod msg;
pub mod pagination;
pub mod snapshot;
pub mod state;
pub mod update;

pub use controller::ViewController;
pub use definitions::{EntityView, Lookup, ViewDefinition};
pub use header::{DataTableHeader, FieldFormat, OrderState, number_format};
pub use modal::{DEFAULT_MODAL_WIDTH, MODAL_ID_PREFIX, Modal, ModalKind, ModalStack};
pub use msg::ViewMsg;
pub use pagination::Pagination;
pub use snapshot::TabSnapshot;
pub use state::ViewModel;
