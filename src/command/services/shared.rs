//! A system and its command manager behind one lock.

use super::CommandManager;
use crate::command::domain::{Command, CommandId, CommandRecord};
use crate::command::error::{CommandError, CommandResult};
use crate::system::services::TaskManSystem;
use crate::task::domain::{User, Username};
use mockable::Clock;
use std::sync::{Arc, Mutex, MutexGuard};

struct Session<C>
where
    C: Clock + Send + Sync,
{
    system: TaskManSystem,
    manager: CommandManager<C>,
}

/// Thread-safe handle pairing a [`TaskManSystem`] with its
/// [`CommandManager`].
///
/// Every call takes the same mutex, so cycle checks and the mutations that
/// follow them are atomic with respect to other callers. Clones share the
/// same session.
pub struct SharedTaskMan<C>
where
    C: Clock + Send + Sync,
{
    session: Arc<Mutex<Session<C>>>,
}

impl<C> Clone for SharedTaskMan<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<C> SharedTaskMan<C>
where
    C: Clock + Send + Sync,
{
    /// Wraps a system and a manager.
    #[must_use]
    pub fn new(system: TaskManSystem, manager: CommandManager<C>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session { system, manager })),
        }
    }

    /// Executes a command; see [`CommandManager::execute`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned, or the
    /// manager's error.
    pub fn execute(&self, command: Command, actor: Username) -> CommandResult<CommandId> {
        let mut guard = self.lock()?;
        let Session { system, manager } = &mut *guard;
        manager.execute(system, command, actor)
    }

    /// Undoes the latest command; see [`CommandManager::undo_last`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned, or the
    /// manager's error.
    pub fn undo_last(&self, current_user: &Username) -> CommandResult<CommandRecord> {
        let mut guard = self.lock()?;
        let Session { system, manager } = &mut *guard;
        manager.undo_last(system, current_user)
    }

    /// Redoes the latest undone command; see [`CommandManager::redo_last`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned, or the
    /// manager's error.
    pub fn redo_last(&self, current_user: &Username) -> CommandResult<CommandRecord> {
        let mut guard = self.lock()?;
        let Session { system, manager } = &mut *guard;
        manager.redo_last(system, current_user)
    }

    /// Runs a read-only query against the system.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned.
    pub fn read<R>(&self, query: impl FnOnce(&TaskManSystem) -> R) -> CommandResult<R> {
        let guard = self.lock()?;
        Ok(query(&guard.system))
    }

    /// Returns a copy of the executed log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned.
    pub fn executed_commands(&self) -> CommandResult<Vec<CommandRecord>> {
        Ok(self.lock()?.manager.executed_commands())
    }

    /// Returns a copy of the undone log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned.
    pub fn undone_commands(&self) -> CommandResult<Vec<CommandRecord>> {
        Ok(self.lock()?.manager.undone_commands())
    }

    /// Registers a user with the wrapped system.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Poisoned`] when the lock is poisoned, or
    /// [`CommandError::System`] when the name is taken.
    pub fn register_user(&self, user: User) -> CommandResult<()> {
        self.lock()?
            .system
            .register_user(user)
            .map_err(CommandError::from)
    }

    fn lock(&self) -> CommandResult<MutexGuard<'_, Session<C>>> {
        self.session
            .lock()
            .map_err(|err| CommandError::Poisoned(err.to_string()))
    }
}
