use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::traits::command::Command;

/// Identity assigned to a command when it enters the history.
///
/// Ids are handed out from a per-history counter starting at 1 and are never
/// reused, so comparing two ids tells which command was logged first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u64);

impl CommandId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for CommandId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A command together with the metadata the history keeps for it.
#[derive(Debug)]
pub struct Record<C> {
    id: CommandId,
    executed: bool,
    executed_at: Option<DateTime<Utc>>,
    command: C,
}

impl<C> Record<C> {
    pub(crate) fn new(id: CommandId, command: C) -> Self {
        Self {
            id,
            executed: false,
            executed_at: None,
            command,
        }
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
        self.executed_at = Some(Utc::now());
    }

    pub(crate) fn mark_undone(&mut self) {
        self.executed = false;
    }

    pub(crate) fn command_mut(&mut self) -> &mut C {
        &mut self.command
    }

    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Whether the command is currently applied.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Wall-clock time of the last successful execute or redo.
    #[must_use]
    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    #[must_use]
    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn into_command(self) -> C {
        self.command
    }
}

impl<C: Command> Record<C> {
    /// Command snapshot merged with the history's metadata.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        json!({
            "id": self.id,
            "executed": self.executed,
            "executedAt": self.executed_at.map(|at| at.to_rfc3339()),
            "command": self.command.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Command for Noop {
        type Host = ();

        fn execute(&mut self, _host: &mut Self::Host) -> anyhow::Result<()> {
            Ok(())
        }

        fn undo(&mut self, _host: &mut Self::Host) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_command_id_ordering_and_display() {
        assert!(CommandId::new(1) < CommandId::new(2));
        assert_eq!(CommandId::from(7).to_string(), "#7");
        assert_eq!(serde_json::to_value(CommandId::new(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_record_lifecycle() {
        let mut record = Record::new(CommandId::new(1), Noop);
        assert!(!record.is_executed());
        assert!(record.executed_at().is_none());

        record.mark_executed();
        assert!(record.is_executed());
        let stamped = record.executed_at().unwrap();

        record.mark_undone();
        assert!(!record.is_executed());
        assert_eq!(record.executed_at(), Some(stamped));
    }

    #[test]
    fn test_record_snapshot() {
        let record = Record::new(CommandId::new(4), Noop);
        let snapshot = record.snapshot();

        assert_eq!(snapshot["id"], json!(4));
        assert_eq!(snapshot["executed"], json!(false));
        assert_eq!(snapshot["executedAt"], Value::Null);
        assert_eq!(snapshot["command"]["kind"], json!("unknown"));
    }
}
