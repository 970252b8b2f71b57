//! Container services: lookups, project and task mutation, the dependency
//! graph engine, and the inverse operations used by undo.

mod container;
mod dependency;
mod reversal;

pub use container::TaskManSystem;
