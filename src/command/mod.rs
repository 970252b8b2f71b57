//! Command-based mutation with linear undo and redo.
//!
//! Every change to a [`crate::system::services::TaskManSystem`] goes through
//! a [`domain::Command`] executed by a [`services::CommandManager`]. The
//! manager records the acting user with each command and only lets that
//! user undo or redo it. Irreversible commands, such as advancing the
//! logical clock, are refused on undo.

pub mod config;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;
