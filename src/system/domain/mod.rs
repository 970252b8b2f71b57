//! Domain model for projects and the container state.

mod error;
mod project;
mod snapshot;
mod state;

pub use error::{SystemError, SystemResult};
pub use project::{Project, ProjectStatus};
pub use snapshot::{ProjectSnapshot, SystemSnapshot, TaskSnapshot, UserSnapshot};
pub use state::SystemState;
