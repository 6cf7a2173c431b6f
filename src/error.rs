use thiserror::Error;

use crate::record::CommandId;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("command {id} ({kind}) failed to execute")]
    Execute {
        id: CommandId,
        kind: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("command {id} ({kind}) failed to undo")]
    Undo {
        id: CommandId,
        kind: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("command {id} ({kind}) failed to redo")]
    Redo {
        id: CommandId,
        kind: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("history was re-entered from one of its own listeners")]
    Reentrant,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("no command registered under {0:?}")]
    Unregistered(String),
    #[error("failed to construct command {name:?}")]
    Construct {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("plugin {0:?} is already installed")]
    AlreadyInstalled(&'static str),
    #[error("plugin {0:?} is not installed")]
    NotInstalled(String),
    #[error("plugin {name:?} failed")]
    Hook {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
