//! API Operations Module
//!
//! A single description of every call the console makes against the query/mutation and
//! user endpoints, executed through the gateway client.

pub mod operation;

pub use operation::{EndpointBase, Operation};
