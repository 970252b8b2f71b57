//! Task execution status and the transitions between statuses.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// All predecessors are satisfied; users may accept role slots.
    Available,
    /// At least one predecessor is not yet satisfied.
    Unavailable,
    /// Some, but not all, role slots are filled.
    Pending,
    /// Every role slot is filled and work has started.
    Executing,
    /// Work completed normally.
    Finished,
    /// Work completed abnormally.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Pending => "pending",
            Self::Executing => "executing",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the status ends the task's execution.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    /// Returns whether a dependency edge may still be attached to or removed
    /// from a task in this status.
    #[must_use]
    pub const fn accepts_dependency_changes(self) -> bool {
        matches!(self, Self::Available | Self::Unavailable)
    }

    /// Returns whether a forward transition to `target` is allowed.
    ///
    /// `Pending -> Available` covers the last assigned user leaving the task.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unavailable, Self::Available)
                | (Self::Available, Self::Unavailable | Self::Pending)
                | (Self::Pending, Self::Executing | Self::Available)
                | (Self::Executing, Self::Finished | Self::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            "pending" => Ok(Self::Pending),
            "executing" => Ok(Self::Executing),
            "finished" => Ok(Self::Finished),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// How a finished task's actual duration compares to its estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishTiming {
    /// Finished faster than the estimate minus the acceptable deviation.
    Early,
    /// Finished within the acceptable deviation.
    OnTime,
    /// Finished slower than the estimate plus the acceptable deviation.
    Delayed,
}
