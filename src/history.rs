use std::{collections::VecDeque, num::NonZeroUsize};

use crate::{
    config::HistoryConfig,
    error::HistoryError,
    event::{HandlerResult, HistoryEvent, Listeners, StackView, SubscriptionId},
    record::{CommandId, Record},
    traits::command::Command,
};

/// Bounded undo/redo log over commands of type `C`.
///
/// The undo stack holds applied commands oldest first; the redo stack holds
/// reverted commands with the most recently undone at the tail. Executing a
/// new command always discards the redo stack, so history stays linear.
///
/// Every stack transition is reported to subscribers synchronously, before the
/// operation returns.
pub struct History<C: Command> {
    undo: VecDeque<Record<C>>,
    redo: VecDeque<Record<C>>,
    last_id: u64,
    stack_size: NonZeroUsize,
    enabled: bool,
    listeners: Listeners<C>,
}

impl<C: Command> Default for History<C> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<C: Command> History<C> {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: VecDeque::with_capacity(config.stack_size.get().min(64)),
            redo: VecDeque::new(),
            last_id: 0,
            stack_size: config.stack_size,
            enabled: config.enabled,
            listeners: Listeners::new(),
        }
    }

    /// Registers a listener for every [`HistoryEvent`].
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&HistoryEvent<'_, C>) -> HandlerResult + Send + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn undo_stack(&self) -> StackView<'_, C> {
        StackView::new(&self.undo)
    }

    #[must_use]
    pub fn redo_stack(&self) -> StackView<'_, C> {
        StackView::new(&self.redo)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns undo, redo and jump back on.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Turns undo, redo and jump into no-ops. Logging new commands still works.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub fn stack_size(&self) -> NonZeroUsize {
        self.stack_size
    }

    /// Changes the capacity. The undo stack is only trimmed on the next push.
    pub fn set_stack_size(&mut self, stack_size: NonZeroUsize) {
        self.stack_size = stack_size;
    }

    /// The id the next logged command will receive.
    #[must_use]
    pub fn next_id(&self) -> CommandId {
        CommandId::new(self.last_id + 1)
    }

    /// Applies `command` to `host` and logs it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Execute`] if the command fails to apply. The
    /// command is then dropped and both stacks are left as they were.
    pub fn execute(&mut self, command: C, host: &mut C::Host) -> Result<CommandId, HistoryError> {
        let mut record = self.allocate(command);
        let id = record.id();
        if let Err(source) = record.command_mut().execute(host) {
            let kind = record.command().kind().into_owned();
            tracing::warn!(%id, %kind, "command failed to execute: {source:#}");
            return Err(HistoryError::Execute { id, kind, source });
        }

        self.log(record, true);
        Ok(id)
    }

    /// Logs a command whose effect the host has already applied.
    pub fn record(&mut self, command: C) -> CommandId {
        let record = self.allocate(command);
        let id = record.id();
        self.log(record, false);
        id
    }

    /// Executes commands in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`HistoryError::Execute`]; commands before it stay logged.
    pub fn execute_batch<I>(
        &mut self,
        commands: I,
        host: &mut C::Host,
    ) -> Result<Vec<CommandId>, HistoryError>
    where
        I: IntoIterator<Item = C>,
    {
        commands
            .into_iter()
            .map(|command| self.execute(command, host))
            .collect()
    }

    /// Takes the next id for `command`. Ids are consumed even when the
    /// command never makes it onto the stack.
    fn allocate(&mut self, command: C) -> Record<C> {
        self.last_id += 1;
        Record::new(CommandId::new(self.last_id), command)
    }

    fn log(&mut self, mut record: Record<C>, applied: bool) {
        record.mark_executed();

        while self.undo.len() >= self.stack_size.get() {
            if let Some(evicted) = self.undo.pop_front() {
                tracing::debug!(id = %evicted.id(), "evicted oldest command");
            }
        }

        tracing::debug!(
            id = %record.id(),
            kind = %record.command().kind(),
            applied,
            "command logged"
        );
        self.undo.push_back(record);
        self.redo.clear();
        self.notify_stack_changed();
    }

    /// Reverts up to `step` commands and returns the last one reverted.
    ///
    /// Returns `Ok(None)` when disabled or when nothing was left to undo.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Undo`] if a command fails to revert. Steps
    /// completed before it stay reverted; the failing command stays on the
    /// undo stack.
    pub fn undo(
        &mut self,
        host: &mut C::Host,
        step: usize,
    ) -> Result<Option<&Record<C>>, HistoryError> {
        if !self.enabled {
            return Ok(None);
        }

        let mut remaining = step;
        let mut moved = false;
        while remaining > 0 && self.undo_one(host)? {
            remaining -= 1;
            moved = true;
        }

        let command = if moved { self.redo.back() } else { None };
        self.listeners.emit(&HistoryEvent::Undo {
            step: remaining,
            command,
        });

        Ok(command)
    }

    /// Reapplies up to `step` commands and returns the last one reapplied.
    ///
    /// Returns `Ok(None)` when disabled or when nothing was left to redo.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Redo`] if a command fails to reapply. Steps
    /// completed before it stay reapplied; the failing command stays on the
    /// redo stack.
    pub fn redo(
        &mut self,
        host: &mut C::Host,
        step: usize,
    ) -> Result<Option<&Record<C>>, HistoryError> {
        if !self.enabled {
            return Ok(None);
        }

        let mut remaining = step;
        let mut moved = false;
        while remaining > 0 && self.redo_one(host)? {
            remaining -= 1;
            moved = true;
        }

        let command = if moved { self.undo.back() } else { None };
        self.listeners.emit(&HistoryEvent::Redo {
            step: remaining,
            command,
        });

        Ok(command)
    }

    fn undo_one(&mut self, host: &mut C::Host) -> Result<bool, HistoryError> {
        let Some(mut record) = self.undo.pop_back() else {
            return Ok(false);
        };

        if let Err(source) = record.command_mut().undo(host) {
            let id = record.id();
            let kind = record.command().kind().into_owned();
            tracing::warn!(%id, %kind, "command failed to undo: {source:#}");
            self.undo.push_back(record);
            return Err(HistoryError::Undo { id, kind, source });
        }

        record.mark_undone();
        tracing::debug!(id = %record.id(), "command undone");
        self.redo.push_back(record);
        self.notify_stack_changed();

        Ok(true)
    }

    fn redo_one(&mut self, host: &mut C::Host) -> Result<bool, HistoryError> {
        let Some(mut record) = self.redo.pop_back() else {
            return Ok(false);
        };

        if let Err(source) = record.command_mut().redo(host) {
            let id = record.id();
            let kind = record.command().kind().into_owned();
            tracing::warn!(%id, %kind, "command failed to redo: {source:#}");
            self.redo.push_back(record);
            return Err(HistoryError::Redo { id, kind, source });
        }

        record.mark_executed();
        tracing::debug!(id = %record.id(), "command redone");
        self.undo.push_back(record);
        self.notify_stack_changed();

        Ok(true)
    }

    /// Walks the history one step at a time towards `target`.
    ///
    /// Moving forward, commands are redone until the undo top's id reaches
    /// `target` or the redo stack runs out. Moving back, commands are undone
    /// until the undo top is exactly `target` or the undo stack runs out, so
    /// an id that is no longer retained unwinds everything.
    ///
    /// # Errors
    ///
    /// Propagates the first failing undo or redo; the walk stops there.
    pub fn jump(&mut self, host: &mut C::Host, target: CommandId) -> Result<(), HistoryError> {
        if !self.enabled {
            return Ok(());
        }

        let forward = self.undo.back().map_or(true, |top| target > top.id());
        tracing::debug!(%target, forward, "jump");

        if forward {
            while !self.redo.is_empty() && self.undo.back().map_or(true, |top| top.id() < target) {
                self.redo(host, 1)?;
            }
        } else {
            while self.undo.back().is_some_and(|top| top.id() != target) {
                self.undo(host, 1)?;
            }
        }

        self.notify_stack_changed();
        Ok(())
    }

    /// Drops every logged command without reverting any of them.
    pub fn dispose(&mut self) {
        self.undo.clear();
        self.redo.clear();
        tracing::debug!("history disposed");

        self.notify_stack_changed();
        self.listeners.emit(&HistoryEvent::Destroy);
    }

    fn notify_stack_changed(&mut self) {
        self.listeners.emit(&HistoryEvent::StackChanged {
            undo: StackView::new(&self.undo),
            redo: StackView::new(&self.redo),
        });
    }
}
