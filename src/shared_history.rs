use std::{cell::RefCell, num::NonZeroUsize, sync::Arc};

use parking_lot::ReentrantMutex;
use serde_json::Value;

use crate::{
    config::HistoryConfig,
    error::HistoryError,
    event::{HandlerResult, HistoryEvent, SubscriptionId},
    history::History,
    record::{CommandId, Record},
    traits::command::Command,
};

/// A [`History`] that can be shared between threads.
///
/// Every operation runs under one lock covering both stacks, so `execute`,
/// `undo`, `redo` and `jump` behave as transactions. Listeners still run
/// synchronously while the lock is held; a listener that calls back into the
/// same history gets [`HistoryError::Reentrant`] instead of a deadlock.
pub struct SharedHistory<C: Command + Send> {
    inner: ReentrantMutex<RefCell<History<C>>>,
}

impl<C> SharedHistory<C>
where
    C: Command + Send,
{
    #[must_use]
    pub fn new(config: HistoryConfig) -> Arc<Self> {
        Arc::new(Self {
            inner: ReentrantMutex::new(RefCell::new(History::new(config))),
        })
    }

    fn with<R>(&self, f: impl FnOnce(&mut History<C>) -> R) -> Result<R, HistoryError> {
        let guard = self.inner.lock();
        let Ok(mut history) = guard.try_borrow_mut() else {
            tracing::warn!("rejected re-entrant history call");
            return Err(HistoryError::Reentrant);
        };

        Ok(f(&mut *history))
    }

    /// # Errors
    ///
    /// See [`History::execute`]; also fails with [`HistoryError::Reentrant`].
    pub fn execute(&self, command: C, host: &mut C::Host) -> Result<CommandId, HistoryError> {
        self.with(|history| history.execute(command, host))?
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn record(&self, command: C) -> Result<CommandId, HistoryError> {
        self.with(|history| history.record(command))
    }

    /// # Errors
    ///
    /// See [`History::execute_batch`]. The whole batch runs under one lock.
    pub fn execute_batch<I>(
        &self,
        commands: I,
        host: &mut C::Host,
    ) -> Result<Vec<CommandId>, HistoryError>
    where
        I: IntoIterator<Item = C>,
    {
        self.with(|history| history.execute_batch(commands, host))?
    }

    /// # Errors
    ///
    /// See [`History::undo`]; also fails with [`HistoryError::Reentrant`].
    pub fn undo(&self, host: &mut C::Host, step: usize) -> Result<Option<CommandId>, HistoryError> {
        self.with(|history| history.undo(host, step).map(|last| last.map(Record::id)))?
    }

    /// # Errors
    ///
    /// See [`History::redo`]; also fails with [`HistoryError::Reentrant`].
    pub fn redo(&self, host: &mut C::Host, step: usize) -> Result<Option<CommandId>, HistoryError> {
        self.with(|history| history.redo(host, step).map(|last| last.map(Record::id)))?
    }

    /// # Errors
    ///
    /// See [`History::jump`]; also fails with [`HistoryError::Reentrant`].
    pub fn jump(&self, host: &mut C::Host, target: CommandId) -> Result<(), HistoryError> {
        self.with(|history| history.jump(host, target))?
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn can_undo(&self) -> Result<bool, HistoryError> {
        self.with(|history| history.can_undo())
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn can_redo(&self) -> Result<bool, HistoryError> {
        self.with(|history| history.can_redo())
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn set_stack_size(&self, stack_size: NonZeroUsize) -> Result<(), HistoryError> {
        self.with(|history| history.set_stack_size(stack_size))
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn enable(&self) -> Result<(), HistoryError> {
        self.with(History::enable)
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn disable(&self) -> Result<(), HistoryError> {
        self.with(History::disable)
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn is_enabled(&self) -> Result<bool, HistoryError> {
        self.with(|history| history.is_enabled())
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn dispose(&self) -> Result<(), HistoryError> {
        self.with(History::dispose)
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn subscribe<F>(&self, handler: F) -> Result<SubscriptionId, HistoryError>
    where
        F: FnMut(&HistoryEvent<'_, C>) -> HandlerResult + Send + 'static,
    {
        self.with(|history| history.subscribe(handler))
    }

    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, HistoryError> {
        self.with(|history| history.unsubscribe(id))
    }

    /// Ids on the undo stack, oldest first.
    ///
    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn undo_ids(&self) -> Result<Vec<CommandId>, HistoryError> {
        self.with(|history| history.undo_stack().ids())
    }

    /// Ids on the redo stack, most recently undone last.
    ///
    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn redo_ids(&self) -> Result<Vec<CommandId>, HistoryError> {
        self.with(|history| history.redo_stack().ids())
    }

    /// Snapshots of the undo stack, oldest first.
    ///
    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn undo_history(&self) -> Result<Vec<Value>, HistoryError> {
        self.with(|history| history.undo_stack().iter().map(Record::snapshot).collect())
    }

    /// Snapshots of the redo stack, most recently undone last.
    ///
    /// # Errors
    ///
    /// Fails only with [`HistoryError::Reentrant`].
    pub fn redo_history(&self) -> Result<Vec<Value>, HistoryError> {
        self.with(|history| history.redo_stack().iter().map(Record::snapshot).collect())
    }
}
