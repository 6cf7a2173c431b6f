use std::borrow::Cow;

use serde_json::{json, Value};

/// A reversible unit of work applied to a host scene.
///
/// A command is built by a collaborator with whatever payload it needs (the
/// object it touches, the attributes it replaces) and handed to a
/// [`History`](crate::history::History). The history assigns identity and
/// timestamps; the command itself only knows how to apply and reverse its
/// effect.
///
/// # Associated Types
///
/// * `Host`: The scene or canvas the command mutates.
///
/// # Required Methods
///
/// * `execute(&mut self, host: &mut Self::Host)`: Applies the effect.
/// * `undo(&mut self, host: &mut Self::Host)`: Reverses exactly the last `execute`.
///
/// # Provided Methods
///
/// * `redo(&mut self, host: &mut Self::Host)`: Reapplies the effect by calling `execute`.
/// * `kind(&self) -> Cow<str>`: The registry name of the command type.
/// * `description(&self) -> Cow<str>`: A human readable label.
/// * `snapshot(&self) -> Value`: An inspectable, loggable view of the command.
///
/// # Example
///
/// ```
/// use canvas_history::prelude::Command;
/// use std::borrow::Cow;
///
/// struct AddShape(&'static str);
///
/// impl Command for AddShape {
///     type Host = Vec<&'static str>;
///
///     fn execute(&mut self, host: &mut Self::Host) -> anyhow::Result<()> {
///         host.push(self.0);
///         Ok(())
///     }
///
///     fn undo(&mut self, host: &mut Self::Host) -> anyhow::Result<()> {
///         host.pop();
///         Ok(())
///     }
///
///     fn kind(&self) -> Cow<'_, str> {
///         Cow::Borrowed("add")
///     }
/// }
///
/// let mut scene = Vec::new();
/// let mut cmd = AddShape("circle");
/// cmd.execute(&mut scene).unwrap();
/// assert_eq!(scene, ["circle"]);
/// cmd.undo(&mut scene).unwrap();
/// assert!(scene.is_empty());
/// ```
pub trait Command {
    type Host;

    /// Applies the command to the host.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the host reports while applying the effect.
    fn execute(&mut self, host: &mut Self::Host) -> anyhow::Result<()>;

    /// Reverses the last successful [`Command::execute`].
    ///
    /// # Errors
    ///
    /// Returns whatever failure the host reports while reversing the effect.
    fn undo(&mut self, host: &mut Self::Host) -> anyhow::Result<()>;

    /// Reapplies the command after an undo. Defaults to `execute`.
    ///
    /// # Errors
    ///
    /// Same as [`Command::execute`].
    fn redo(&mut self, host: &mut Self::Host) -> anyhow::Result<()> {
        self.execute(host)
    }

    /// The name this command type is registered under.
    fn kind(&self) -> Cow<'_, str> {
        Cow::Borrowed("unknown")
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed("Unknown command")
    }

    /// Produces a loggable view of the command. Not required to round-trip.
    fn snapshot(&self) -> Value {
        json!({
            "kind": self.kind(),
            "description": self.description(),
        })
    }
}
