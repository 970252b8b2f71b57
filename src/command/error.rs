//! Error types for the command manager.

use crate::system::domain::SystemError;
use crate::task::domain::Username;
use thiserror::Error;

/// Errors returned by command execution, undo and redo.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// No executed command is available to undo.
    #[error("no command to undo")]
    EmptyUndoStack,

    /// No undone command is available to redo.
    #[error("no command to redo")]
    EmptyRedoStack,

    /// The latest command belongs to another user.
    #[error("command was executed by {expected}, not {actual}")]
    IncorrectUser {
        /// User who executed the command.
        expected: Username,
        /// User who requested undo or redo.
        actual: Username,
    },

    /// The latest command has no inverse.
    #[error("command {0} cannot be undone")]
    UndoNotPossible(&'static str),

    /// A shared session lock was poisoned by a panicking holder.
    #[error("session lock poisoned: {0}")]
    Poisoned(String),

    /// The operation was rejected by the system.
    #[error(transparent)]
    System(#[from] SystemError),
}

/// Result type for command manager operations.
pub type CommandResult<T> = Result<T, CommandError>;
