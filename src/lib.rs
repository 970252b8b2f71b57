//! Taskman: project and task tracking with dependency-aware scheduling.
//!
//! This crate provides the core of a task management system: a per-task
//! execution state machine, an acyclic dependency graph spanning projects,
//! and a command log with per-user undo and redo.
//!
//! # Architecture
//!
//! Taskman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`task`]: Task state machine, roles, users and time values
//! - [`system`]: Project container, dependency graph and persistence port
//! - [`command`]: Undoable commands and the command manager

pub mod command;
pub mod system;
pub mod task;
