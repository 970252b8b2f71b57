//! Domain model for tasks, users and the task state machine.
//!
//! Tasks reference each other by [`TaskRef`] so that dependency edges can
//! cross project boundaries without shared ownership.

mod error;
mod ids;
mod role;
mod status;
mod task;
mod time;
mod user;

pub use error::{ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ProjectName, TaskName, TaskRef, Username};
pub use role::Role;
pub use status::{FinishTiming, TaskStatus};
pub use task::{ReplacementSpec, Task, TaskSpec};
pub use time::{Deviation, Time};
pub use user::{Assignment, Reassignment, User};
