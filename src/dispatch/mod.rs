//! Operator command handling
//!
//! - [`command`] - classification of raw input into a `Command`
//! - [`dispatcher`] - the read-evaluate loop and per-command handlers
//! - [`input`] - line reading that survives undecodable input
//! - [`opener`] - launching the desktop file explorer or browser

pub mod command;
pub mod dispatcher;
pub mod input;
pub mod opener;

pub use command::{classify, Builtin, Command};
pub use dispatcher::{user_guide, Dispatcher, Flow};
pub use input::read_line;
pub use opener::{Opener, SystemOpener};
