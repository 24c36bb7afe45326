//! crud-console
//!
//! Administration console for a remote JSON query API: typed query clauses, a session-aware
//! gateway, entity models, and an Elm-style controller per entity with a view layer on top.

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod entity;
pub mod models;
pub mod view;

#[cfg(test)]
mod testing;
