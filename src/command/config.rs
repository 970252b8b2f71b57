//! Configuration for the command log.

use serde::{Deserialize, Serialize};

/// Limits applied to the executed-command log.
///
/// # Examples
///
/// ```
/// use taskman::command::config::CommandHistoryConfig;
///
/// let unbounded = CommandHistoryConfig::default();
/// assert_eq!(unbounded.max_undo_depth, None);
///
/// let bounded = CommandHistoryConfig::bounded(50);
/// assert_eq!(bounded.max_undo_depth, Some(50));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandHistoryConfig {
    /// Maximum number of executed commands kept for undo. The oldest entries
    /// are discarded once the log grows past it. `None` keeps everything.
    pub max_undo_depth: Option<usize>,
}

impl CommandHistoryConfig {
    /// Creates a configuration that keeps at most `depth` undoable commands.
    #[must_use]
    pub const fn bounded(depth: usize) -> Self {
        Self {
            max_undo_depth: Some(depth),
        }
    }

    /// Creates a configuration without a depth limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_undo_depth: None,
        }
    }
}
