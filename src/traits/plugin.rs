use std::any::Any;

use crate::plugins::Mutation;

/// An extension installed into a host such as a whiteboard.
///
/// The host keeps plugins behind this trait and never assumes a concrete
/// type; typed access goes through [`Plugin::as_any`].
///
/// # Required Methods
///
/// * `name(&self)`: Key the host stores the plugin under.
/// * `install(&mut self, host: &mut H)`: Called once when the plugin is added.
/// * `as_any` / `as_any_mut`: Downcasting hooks, usually `self`.
///
/// # Provided Methods
///
/// * `enable`, `disable`, `is_enabled`: No-ops; a plugin is enabled unless it says otherwise.
/// * `destroy`: Called when the plugin is removed or the host shuts down.
/// * `on_mutation`: Called for every scene mutation the host reports.
pub trait Plugin<H>: Any {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// A failed install keeps the plugin out of the host.
    fn install(&mut self, host: &mut H) -> anyhow::Result<()>;

    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn is_enabled(&self) -> bool {
        true
    }

    fn destroy(&mut self) {}

    /// # Errors
    ///
    /// Reported back to whoever dispatched the mutation.
    fn on_mutation(&mut self, _host: &mut H, _mutation: &Mutation) -> anyhow::Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
