use std::path::PathBuf;
use thiserror::Error;

/// Core error types for the delivery car orchestrator
///
/// Configuration errors live in `crate::config::ConfigError`; a failed load
/// never reaches the command handlers, which only see the last good snapshot.
/// Per-file move failures are not errors of the batch; they are collected in
/// `crate::mover::BatchMoveReport`.
#[derive(Error, Debug)]
pub enum MoverError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Invalid path: {path}")]
	InvalidPath { path: String },

	#[error("Not a directory: {path}")]
	NotADirectory { path: String },

	#[error("Destination unavailable: {path} - {cause}")]
	DestinationUnavailable { path: PathBuf, cause: std::io::Error },

	#[error("Failed to send stop signal to watcher")]
	StopSignal,

	#[error("No configuration loaded")]
	NotInitialized,
}

impl MoverError {
	/// Whether the command loop can keep going after this error.
	///
	/// Watch failures end the watcher task; everything else is reported and
	/// the operator simply issues the next command.
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, MoverError::Notify(_) | MoverError::StopSignal)
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			MoverError::Io(_) => "io",
			MoverError::Notify(_) => "notify",
			MoverError::InvalidPath { .. } => "configuration",
			MoverError::NotADirectory { .. } => "scan",
			MoverError::DestinationUnavailable { .. } => "move",
			MoverError::StopSignal => "shutdown",
			MoverError::NotInitialized => "initialization",
		}
	}

	pub fn invalid_path(path: &std::path::Path) -> Self {
		MoverError::InvalidPath { path: path.display().to_string() }
	}

	pub fn not_a_directory(path: &std::path::Path) -> Self {
		MoverError::NotADirectory { path: path.display().to_string() }
	}
}

pub type Result<T> = std::result::Result<T, MoverError>;
