//! Task state machine.
//!
//! A task moves through `Unavailable`, `Available`, `Pending`, `Executing`
//! and one of the terminal statuses `Finished` or `Failed`. Transitions are
//! guarded: an operation attempted from the wrong source status fails with
//! [`domain::TaskDomainError::IncorrectTaskStatus`] and leaves the task
//! untouched. Users fill role slots through the [`domain::User`] entity,
//! which guarantees that nobody executes two tasks at once.

pub mod domain;

#[cfg(test)]
mod tests;
