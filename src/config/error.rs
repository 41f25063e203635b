//! Configuration specific error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Configuration file not found: {path}")]
	NotFound { path: PathBuf },

	#[error("Failed to read configuration file {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse configuration file {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("'delivery_car' path is missing or blank")]
	MissingInbox,

	#[error("Alias '{alias}' is defined more than once (aliases are case-insensitive)")]
	DuplicateAlias { alias: String },

	#[error("Unknown collision policy '{value}' (expected: overwrite, skip, keep-both)")]
	InvalidCollisionPolicy { value: String },
}

impl ConfigError {
	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			ConfigError::NotFound { .. } | ConfigError::Read { .. } => "io",
			ConfigError::Parse { .. } => "parse",
			ConfigError::MissingInbox
			| ConfigError::DuplicateAlias { .. }
			| ConfigError::InvalidCollisionPolicy { .. } => "configuration",
		}
	}
}
