#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::correctness)]
#![warn(clippy::complexity)]
#![warn(clippy::suspicious)]
#![warn(clippy::cargo)]

pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod history_plugin;
pub mod plugins;
pub mod record;
pub mod registry;
pub mod shared_history;
pub mod traits;

pub mod prelude {
	pub use crate::config::HistoryConfig;
	pub use crate::error::{HistoryError, PluginError, RegistryError};
	pub use crate::event::{HandlerResult, HistoryEvent, StackView, SubscriptionId};
	pub use crate::history::History;
	pub use crate::history_plugin::HistoryPlugin;
	pub use crate::plugins::{Mutation, Plugins};
	pub use crate::record::{CommandId, Record};
	pub use crate::registry::CommandRegistry;
	pub use crate::shared_history::SharedHistory;
	pub use crate::traits::command::Command;
	pub use crate::traits::plugin::Plugin;
}
