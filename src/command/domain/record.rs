//! Entries of the executed and undone command logs.

use super::command::Reversal;
use super::{Command, CommandId};
use crate::task::domain::Username;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// A command together with the user who executed it and the state needed
/// to reverse it.
///
/// Redo moves the same record back onto the executed log, so authorship and
/// identity survive any number of undo/redo cycles. The reversal state is
/// replaced on every redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    id: CommandId,
    command: Command,
    reversal: Reversal,
    actor: Username,
    recorded_at: DateTime<Utc>,
}

impl CommandRecord {
    /// Creates a record stamped with the current wall-clock time.
    pub(crate) fn new(
        command: Command,
        reversal: Reversal,
        actor: Username,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: CommandId::new(),
            command,
            reversal,
            actor,
            recorded_at: clock.utc(),
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> CommandId {
        self.id
    }

    /// Returns the recorded command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Returns the user who executed the command.
    #[must_use]
    pub const fn actor(&self) -> &Username {
        &self.actor
    }

    /// Returns when the command was first executed.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub(crate) const fn reversal(&self) -> &Reversal {
        &self.reversal
    }

    pub(crate) fn set_reversal(&mut self, reversal: Reversal) {
        self.reversal = reversal;
    }
}
