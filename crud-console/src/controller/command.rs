//! Side effects returned by the reducers

use std::fmt;

use super::msg::{CallResult, Msg};
use super::notify::Notification;
use crate::api::Operation;
use crate::entity::Entity;

/// Turns a call outcome back into a message
pub type Continuation<E> = Box<dyn FnOnce(CallResult) -> Msg<E> + Send>;

pub enum Command<E: Entity> {
    None,
    /// Perform a gateway call and feed its outcome back as a message
    Call {
        operation: Operation,
        blocking: bool,
        then: Continuation<E>,
    },
    /// Show a notification
    Notify(Notification),
    /// Feed a message back into the core reducer
    Dispatch(Msg<E>),
    Batch(Vec<Command<E>>),
}

impl<E: Entity> Command<E> {
    /// Blocking call, counted by the loading indicator
    pub fn call(
        operation: Operation,
        then: impl FnOnce(CallResult) -> Msg<E> + Send + 'static,
    ) -> Self {
        Command::Call {
            operation,
            blocking: true,
            then: Box::new(then),
        }
    }

    pub fn notify(notification: Notification) -> Self {
        Command::Notify(notification)
    }

    pub fn batch(commands: impl IntoIterator<Item = Command<E>>) -> Self {
        Command::Batch(commands.into_iter().collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl<E: Entity> fmt::Debug for Command<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Call {
                operation,
                blocking,
                ..
            } => f
                .debug_struct("Call")
                .field("operation", operation)
                .field("blocking", blocking)
                .finish_non_exhaustive(),
            Command::Notify(notification) => f.debug_tuple("Notify").field(notification).finish(),
            Command::Dispatch(msg) => f.debug_tuple("Dispatch").field(msg).finish(),
            Command::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
        }
    }
}
