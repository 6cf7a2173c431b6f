use std::{collections::HashMap, fmt};

use serde_json::Value;

use crate::{error::RegistryError, traits::command::Command};

pub type Constructor<C> =
    Box<dyn Fn(&<C as Command>::Host, Value) -> anyhow::Result<C> + Send + Sync>;

/// Maps command type names to constructors.
///
/// Registering a name twice replaces the earlier constructor; the replaced one
/// is handed back so callers can tell.
pub struct CommandRegistry<C: Command> {
    constructors: HashMap<String, Constructor<C>>,
}

impl<C: Command> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }
}

impl<C: Command> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<C: Command> CommandRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Option<Constructor<C>>
    where
        F: Fn(&C::Host, Value) -> anyhow::Result<C> + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self.constructors.insert(name.clone(), Box::new(constructor));
        if replaced.is_some() {
            tracing::warn!(%name, "command constructor replaced");
        }
        replaced
    }

    pub fn unregister(&mut self, name: &str) -> Option<Constructor<C>> {
        self.constructors.remove(name)
    }

    /// Builds a command of type `name` from `options`.
    ///
    /// # Errors
    ///
    /// Fails if nothing is registered under `name` or the constructor rejects
    /// the options.
    pub fn create(&self, name: &str, host: &C::Host, options: Value) -> Result<C, RegistryError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RegistryError::Unregistered(name.to_owned()))?;

        constructor(host, options).map_err(|source| RegistryError::Construct {
            name: name.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
