use std::any::Any;

use crate::{
    config::HistoryConfig,
    error::HistoryError,
    history::History,
    plugins::Mutation,
    record::CommandId,
    registry::CommandRegistry,
    traits::{command::Command, plugin::Plugin},
};

/// Logs every scene mutation the host reports as an undoable command.
///
/// The host has already applied a mutation by the time it is dispatched, so
/// the command built for it is recorded without being executed again.
pub struct HistoryPlugin<C: Command> {
    history: History<C>,
    registry: CommandRegistry<C>,
}

impl<C: Command> HistoryPlugin<C> {
    pub const NAME: &'static str = "history";

    #[must_use]
    pub fn new(config: HistoryConfig, registry: CommandRegistry<C>) -> Self {
        Self {
            history: History::new(config),
            registry,
        }
    }

    #[must_use]
    pub fn history(&self) -> &History<C> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History<C> {
        &mut self.history
    }

    #[must_use]
    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry<C> {
        &mut self.registry
    }

    /// Builds the command for `mutation` and logs it.
    ///
    /// # Errors
    ///
    /// Fails if the mutation kind has no registered constructor or the
    /// constructor rejects its options.
    pub fn observe(
        &mut self,
        host: &C::Host,
        mutation: &Mutation,
    ) -> Result<CommandId, HistoryError> {
        let command = self
            .registry
            .create(&mutation.kind, host, mutation.options.clone())?;
        Ok(self.history.record(command))
    }
}

impl<C> Plugin<C::Host> for HistoryPlugin<C>
where
    C: Command + 'static,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn install(&mut self, _host: &mut C::Host) -> anyhow::Result<()> {
        tracing::debug!(
            commands = ?self.registry,
            stack_size = self.history.stack_size().get(),
            "history plugin installed"
        );
        Ok(())
    }

    fn enable(&mut self) {
        self.history.enable();
    }

    fn disable(&mut self) {
        self.history.disable();
    }

    fn is_enabled(&self) -> bool {
        self.history.is_enabled()
    }

    fn destroy(&mut self) {
        self.history.dispose();
    }

    fn on_mutation(&mut self, host: &mut C::Host, mutation: &Mutation) -> anyhow::Result<()> {
        self.observe(host, mutation)?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
