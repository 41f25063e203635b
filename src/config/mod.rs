//! Reloadable configuration
//!
//! - [`settings`] - YAML parsing and the immutable `Settings` snapshot
//! - [`store`] - `ConfigStore`, the atomically swapped holder of the snapshot
//! - [`error`] - configuration specific error types

pub mod error;
pub mod settings;
pub mod store;

pub use error::ConfigError;
pub use settings::{CollisionPolicy, Settings};
pub use store::ConfigStore;
