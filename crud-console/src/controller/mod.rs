//! Core Controller
//!
//! Entity-agnostic CRUD orchestration: clause state and paging, request shaping per view
//! state, the reducer that turns messages into state changes and gateway calls, the
//! runtime that executes them, and field-level validation.

pub mod command;
pub mod core;
pub mod error;
pub mod msg;
pub mod notify;
pub mod request;
pub mod state;
pub mod update;
pub mod validation;

pub use command::Command;
pub use self::core::CoreController;
pub use error::ControllerError;
pub use msg::{CallResult, Msg};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier};
pub use request::{load_request_body, request_body_for_view_state};
pub use state::{ControllerState, DEFAULT_ROW_LIMIT, QueryState, ViewState};
pub use validation::{Validator, string_is_only_numbers};
