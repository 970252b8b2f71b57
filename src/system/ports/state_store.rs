//! Persistence port for whole-system state.
//!
//! The container never reads or writes storage itself. A collaborator
//! exports [`SystemState`], wraps it in a checksummed [`StateBlob`] and hands
//! it to a [`StateStore`].

use crate::system::domain::SystemState;
use crate::system::services::TaskManSystem;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

/// Result type for state store operations.
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// Serialized system state with an integrity checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBlob {
    payload: String,
    checksum: String,
}

impl StateBlob {
    /// Serializes `state` and computes its checksum.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Serialization`] when the state cannot be
    /// encoded.
    pub fn encode(state: &SystemState) -> StateStoreResult<Self> {
        let payload = serde_json::to_string(state)
            .map_err(|err| StateStoreError::Serialization(err.to_string()))?;
        let checksum = digest(&payload);
        Ok(Self { payload, checksum })
    }

    /// Assembles a blob from raw parts, as read back from storage.
    #[must_use]
    pub fn from_parts(payload: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            checksum: checksum.into(),
        }
    }

    /// Verifies the checksum and decodes the state.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::ChecksumMismatch`] when the payload was
    /// altered, or [`StateStoreError::Serialization`] when it does not decode.
    pub fn decode(&self) -> StateStoreResult<SystemState> {
        let actual = digest(&self.payload);
        if actual != self.checksum {
            return Err(StateStoreError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        serde_json::from_str(&self.payload)
            .map_err(|err| StateStoreError::Serialization(err.to_string()))
    }

    /// Returns the JSON payload.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the hex-encoded SHA-256 checksum of the payload.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

fn digest(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Storage contract for system state blobs.
pub trait StateStore: Send + Sync {
    /// Replaces the stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Persistence`] when the backend fails.
    fn save(&self, blob: &StateBlob) -> StateStoreResult<()>;

    /// Returns the stored blob, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Persistence`] when the backend fails.
    fn load(&self) -> StateStoreResult<Option<StateBlob>>;
}

/// Errors returned by state store operations and blob handling.
#[derive(Debug, Clone, Error)]
pub enum StateStoreError {
    /// The state could not be encoded or decoded.
    #[error("state serialization failed: {0}")]
    Serialization(String),

    /// The payload does not match its checksum.
    #[error("state checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        /// Checksum recorded alongside the payload.
        expected: String,
        /// Checksum computed from the payload.
        actual: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StateStoreError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Exports the state of `system` and saves it through `store`.
///
/// # Errors
///
/// Propagates encoding and backend failures.
pub fn save_system(store: &dyn StateStore, system: &TaskManSystem) -> StateStoreResult<()> {
    let blob = StateBlob::encode(&system.to_state())?;
    store.save(&blob)
}

/// Loads and verifies the stored state, rebuilding a system from it.
///
/// # Errors
///
/// Propagates backend failures and checksum or decoding errors.
pub fn load_system(store: &dyn StateStore) -> StateStoreResult<Option<TaskManSystem>> {
    store
        .load()?
        .map(|blob| blob.decode().map(TaskManSystem::from_state))
        .transpose()
}
