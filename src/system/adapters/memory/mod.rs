//! In-memory adapters.

mod state_store;

pub use state_store::InMemoryStateStore;
