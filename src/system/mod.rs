//! Project/system container.
//!
//! This module owns every project, every registered user and the logical
//! clock. It also hosts the dependency graph engine that keeps the
//! cross-project task graph acyclic and task availability consistent with
//! predecessor completion.
//!
//! Mutating operations are crate-private and exposed through commands in
//! [`crate::command`], which keeps every change eligible for undo and redo.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
