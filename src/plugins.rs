use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::PluginError, traits::plugin::Plugin};

/// A change the host made to its scene, named after the command type that
/// can reproduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub kind: String,
    #[serde(default)]
    pub options: Value,
}

impl Mutation {
    pub fn new(kind: impl Into<String>, options: Value) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }
}

/// Plugins installed into a host of type `H`, keyed by plugin name.
pub struct Plugins<H: 'static> {
    installed: HashMap<&'static str, Box<dyn Plugin<H>>>,
    order: Vec<&'static str>,
}

impl<H: 'static> Default for Plugins<H> {
    fn default() -> Self {
        Self {
            installed: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<H: 'static> Plugins<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `plugin` into `host` and keeps it under its name.
    ///
    /// # Errors
    ///
    /// Fails if a plugin with the same name is already installed, or if the
    /// plugin's own install hook fails.
    pub fn install<P>(&mut self, mut plugin: P, host: &mut H) -> Result<(), PluginError>
    where
        P: Plugin<H>,
    {
        let name = plugin.name();
        if self.installed.contains_key(name) {
            return Err(PluginError::AlreadyInstalled(name));
        }

        plugin
            .install(host)
            .map_err(|source| PluginError::Hook { name, source })?;

        tracing::info!(plugin = name, "plugin installed");
        self.installed.insert(name, Box::new(plugin));
        self.order.push(name);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    /// Names in install order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    /// The first installed plugin of type `P`.
    #[must_use]
    pub fn get<P: Plugin<H>>(&self) -> Option<&P> {
        self.order
            .iter()
            .filter_map(|name| self.installed.get(name))
            .find_map(|plugin| plugin.as_any().downcast_ref::<P>())
    }

    pub fn get_mut<P: Plugin<H>>(&mut self) -> Option<&mut P> {
        let name = *self.order.iter().find(|name| {
            self.installed
                .get(*name)
                .is_some_and(|plugin| plugin.as_any().is::<P>())
        })?;

        self.installed
            .get_mut(name)?
            .as_any_mut()
            .downcast_mut::<P>()
    }

    /// # Errors
    ///
    /// Fails if no plugin is installed under `name`.
    pub fn enable(&mut self, name: &str) -> Result<(), PluginError> {
        self.named_mut(name)?.enable();
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if no plugin is installed under `name`.
    pub fn disable(&mut self, name: &str) -> Result<(), PluginError> {
        self.named_mut(name)?.disable();
        Ok(())
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.installed.get(name).map(|plugin| plugin.is_enabled())
    }

    /// Reports a scene mutation to every plugin in install order.
    ///
    /// Plugins see mutations whether or not they are enabled; what enabling
    /// gates is up to each plugin.
    ///
    /// # Errors
    ///
    /// Stops at the first plugin that fails.
    pub fn dispatch(&mut self, host: &mut H, mutation: &Mutation) -> Result<(), PluginError> {
        tracing::trace!(kind = %mutation.kind, "dispatching mutation");
        for &name in &self.order {
            if let Some(plugin) = self.installed.get_mut(name) {
                plugin
                    .on_mutation(host, mutation)
                    .map_err(|source| PluginError::Hook { name, source })?;
            }
        }
        Ok(())
    }

    /// Destroys and drops the plugin installed under `name`.
    ///
    /// # Errors
    ///
    /// Fails if no plugin is installed under `name`.
    pub fn remove(&mut self, name: &str) -> Result<(), PluginError> {
        let mut plugin = self
            .installed
            .remove(name)
            .ok_or_else(|| PluginError::NotInstalled(name.to_owned()))?;
        self.order.retain(|installed| *installed != name);

        plugin.destroy();
        tracing::info!(plugin = name, "plugin removed");
        Ok(())
    }

    /// Destroys every plugin, most recently installed first.
    pub fn destroy_all(&mut self) {
        for name in self.order.drain(..).rev() {
            if let Some(mut plugin) = self.installed.remove(name) {
                plugin.destroy();
            }
        }
    }

    fn named_mut(&mut self, name: &str) -> Result<&mut Box<dyn Plugin<H>>, PluginError> {
        self.installed
            .get_mut(name)
            .ok_or_else(|| PluginError::NotInstalled(name.to_owned()))
    }
}
