//! In-memory state store for tests and single-process embedding.

use std::sync::{Arc, RwLock};

use crate::system::ports::{StateBlob, StateStore, StateStoreError, StateStoreResult};

/// Thread-safe in-memory state store holding the latest blob.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    slot: Arc<RwLock<Option<StateBlob>>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn save(&self, blob: &StateBlob) -> StateStoreResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|err| StateStoreError::persistence(std::io::Error::other(err.to_string())))?;
        *slot = Some(blob.clone());
        Ok(())
    }

    fn load(&self) -> StateStoreResult<Option<StateBlob>> {
        let slot = self
            .slot
            .read()
            .map_err(|err| StateStoreError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(slot.clone())
    }
}
