//! Port contracts for persisting system state.
//!
//! Ports define infrastructure-agnostic interfaces used by the container's
//! collaborators.

pub mod state_store;

pub use state_store::{
    StateBlob, StateStore, StateStoreError, StateStoreResult, load_system, save_system,
};
