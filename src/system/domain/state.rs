//! Complete container state as exchanged with the persistence collaborator.

use super::Project;
use crate::task::domain::{Time, User};
use serde::{Deserialize, Serialize};

/// Parameter object for persisting and restoring the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    /// Logical clock value.
    pub clock: Time,
    /// Projects in creation order, each owning its tasks.
    pub projects: Vec<Project>,
    /// Registered users.
    pub users: Vec<User>,
}
