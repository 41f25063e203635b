pub mod config;
pub mod console;
pub mod dispatch;
mod error;
mod events;
pub mod inventory;
pub mod link_parser;
pub mod mover;
mod watcher;

pub use config::{CollisionPolicy, ConfigError, ConfigStore, Settings};
pub use console::{CaptureBuffer, Console, PROMPT};
pub use dispatch::{classify, Builtin, Command, Dispatcher, Flow, Opener, SystemOpener};
pub use error::{MoverError, Result};
pub use events::{NotificationKind, WatchNotification};
pub use inventory::{scan, InventoryFile, InventoryReporter};
pub use mover::{batch_move, BatchMoveReport, MoveFailure};
pub use watcher::{
	start, WatchSupervisor, WatcherConfig, WatcherHandle, WatcherState, DEFAULT_COALESCE_WINDOW,
};
