//! Linear undo/redo log with per-user ownership.

use crate::command::config::CommandHistoryConfig;
use crate::command::domain::{Command, CommandId, CommandRecord};
use crate::command::error::{CommandError, CommandResult};
use crate::system::services::TaskManSystem;
use crate::task::domain::Username;
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Executes commands against a system and keeps the undo and redo stacks.
///
/// Only the user who executed the most recent command may undo it, and only
/// the user who executed the most recently undone command may redo it.
pub struct CommandManager<C>
where
    C: Clock + Send + Sync,
{
    executed: Vec<CommandRecord>,
    undone: Vec<CommandRecord>,
    config: CommandHistoryConfig,
    clock: Arc<C>,
}

impl<C> CommandManager<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a manager with an unbounded history.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_config(CommandHistoryConfig::default(), clock)
    }

    /// Creates a manager with the given history limits.
    #[must_use]
    pub const fn with_config(config: CommandHistoryConfig, clock: Arc<C>) -> Self {
        Self {
            executed: Vec::new(),
            undone: Vec::new(),
            config,
            clock,
        }
    }

    /// Applies `command` on behalf of `actor` and records it.
    ///
    /// A successful execution clears the redo stack.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::System`] when the system rejects the command.
    /// Nothing is recorded and the system is unchanged in that case.
    pub fn execute(
        &mut self,
        system: &mut TaskManSystem,
        command: Command,
        actor: Username,
    ) -> CommandResult<CommandId> {
        let reversal = command.apply(system)?;
        let record = CommandRecord::new(command, reversal, actor, &*self.clock);
        let id = record.id();
        info!(
            command = %record.command(),
            actor = %record.actor(),
            id = %id,
            "command executed"
        );
        self.executed.push(record);
        self.undone.clear();
        self.trim_history();
        Ok(id)
    }

    /// Reverses the most recent executed command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyUndoStack`] when nothing was executed,
    /// [`CommandError::IncorrectUser`] when `current_user` did not execute
    /// the command, or [`CommandError::UndoNotPossible`] for irreversible
    /// commands. The system is unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics when the reversal itself fails, which means the system was
    /// changed behind the manager's back.
    pub fn undo_last(
        &mut self,
        system: &mut TaskManSystem,
        current_user: &Username,
    ) -> CommandResult<CommandRecord> {
        let top = self.executed.last().ok_or(CommandError::EmptyUndoStack)?;
        check_owner(top, current_user)?;
        if !top.command().is_reversible() {
            warn!(command = %top.command().name(), user = %current_user, "undo refused");
            return Err(CommandError::UndoNotPossible(top.command().name()));
        }
        let record = self.executed.pop().ok_or(CommandError::EmptyUndoStack)?;
        record.command().reverse(record.reversal(), system);
        info!(command = %record.command(), actor = %record.actor(), id = %record.id(), "command undone");
        self.undone.push(record.clone());
        Ok(record)
    }

    /// Re-applies the most recently undone command.
    ///
    /// The record keeps its original actor and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyRedoStack`] when nothing was undone,
    /// [`CommandError::IncorrectUser`] when `current_user` did not execute
    /// the command, or [`CommandError::System`] when re-application is
    /// rejected. The record stays on the redo stack on error.
    pub fn redo_last(
        &mut self,
        system: &mut TaskManSystem,
        current_user: &Username,
    ) -> CommandResult<CommandRecord> {
        let top = self.undone.last_mut().ok_or(CommandError::EmptyRedoStack)?;
        check_owner(top, current_user)?;
        let reversal = top.command().apply(system)?;
        top.set_reversal(reversal);
        let record = self.undone.pop().ok_or(CommandError::EmptyRedoStack)?;
        info!(command = %record.command(), actor = %record.actor(), id = %record.id(), "command redone");
        self.executed.push(record.clone());
        self.trim_history();
        Ok(record)
    }

    /// Returns a copy of the executed log, oldest first.
    #[must_use]
    pub fn executed_commands(&self) -> Vec<CommandRecord> {
        self.executed.clone()
    }

    /// Returns a copy of the undone log, oldest first.
    #[must_use]
    pub fn undone_commands(&self) -> Vec<CommandRecord> {
        self.undone.clone()
    }

    /// Returns the most recent executed command.
    #[must_use]
    pub fn last_executed(&self) -> Option<CommandRecord> {
        self.executed.last().cloned()
    }

    /// Returns the most recently undone command.
    #[must_use]
    pub fn last_undone(&self) -> Option<CommandRecord> {
        self.undone.last().cloned()
    }

    /// Returns the history configuration.
    #[must_use]
    pub const fn config(&self) -> CommandHistoryConfig {
        self.config
    }

    fn trim_history(&mut self) {
        let Some(limit) = self.config.max_undo_depth else {
            return;
        };
        let excess = self.executed.len().saturating_sub(limit);
        if excess > 0 {
            self.executed.drain(..excess);
        }
    }
}

fn check_owner(record: &CommandRecord, current_user: &Username) -> CommandResult<()> {
    if record.actor() == current_user {
        return Ok(());
    }
    warn!(
        command = %record.command().name(),
        owner = %record.actor(),
        user = %current_user,
        "undo/redo refused for another user's command"
    );
    Err(CommandError::IncorrectUser {
        expected: record.actor().clone(),
        actual: current_user.clone(),
    })
}
