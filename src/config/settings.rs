use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use super::error::ConfigError;

/// What the mover does when a file with the same name already sits in the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
	/// Replace the existing file (last write wins)
	#[default]
	Overwrite,
	/// Leave the inbox file where it is
	Skip,
	/// Move under a fresh name such as `name (1).png`
	KeepBoth,
}

impl FromStr for CollisionPolicy {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"overwrite" | "replace" => Ok(CollisionPolicy::Overwrite),
			"skip" => Ok(CollisionPolicy::Skip),
			"keep-both" | "keep_both" | "rename" => Ok(CollisionPolicy::KeepBoth),
			_ => Err(ConfigError::InvalidCollisionPolicy { value: s.to_string() }),
		}
	}
}

impl fmt::Display for CollisionPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			CollisionPolicy::Overwrite => "overwrite",
			CollisionPolicy::Skip => "skip",
			CollisionPolicy::KeepBoth => "keep-both",
		};
		f.write_str(name)
	}
}

/// On-disk shape of the configuration file
#[derive(Debug, Deserialize)]
struct RawConfig {
	delivery_car: Option<String>,
	#[serde(default)]
	mappings: Option<BTreeMap<String, Option<String>>>,
	#[serde(default)]
	collision_policy: Option<String>,
}

/// One immutable, fully validated configuration snapshot.
///
/// A snapshot is never modified after construction; a reload builds a new
/// one and swaps it in.
#[derive(Debug, Clone)]
pub struct Settings {
	inbox_path: PathBuf,
	/// Keys are stored lowercased
	aliases: HashMap<String, PathBuf>,
	collision_policy: CollisionPolicy,
	source: PathBuf,
	loaded_at: DateTime<Utc>,
	generation: u64,
}

impl Settings {
	/// Parse and validate YAML content read from `source`.
	pub fn from_yaml_str(content: &str, source: &Path) -> Result<Self, ConfigError> {
		if content.trim().is_empty() {
			return Err(ConfigError::MissingInbox);
		}

		let raw: RawConfig = serde_yaml::from_str(content)
			.map_err(|e| ConfigError::Parse { path: source.to_path_buf(), source: e })?;

		let inbox_path = match raw.delivery_car {
			Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
			_ => return Err(ConfigError::MissingInbox),
		};

		let mut aliases = HashMap::new();
		for (alias, destination) in raw.mappings.unwrap_or_default() {
			let key = alias.trim().to_lowercase();
			// An alias without a destination stays unresolved
			let destination = match destination.as_deref().map(str::trim) {
				Some(path) if !path.is_empty() => PathBuf::from(path),
				_ => {
					warn!("Alias [{}] has no destination path; ignoring it", key);
					continue;
				}
			};
			if aliases.insert(key.clone(), destination).is_some() {
				return Err(ConfigError::DuplicateAlias { alias: key });
			}
		}

		let collision_policy = match raw.collision_policy {
			Some(value) => value.parse()?,
			None => CollisionPolicy::default(),
		};

		Ok(Self {
			inbox_path,
			aliases,
			collision_policy,
			source: source.to_path_buf(),
			loaded_at: Utc::now(),
			generation: 0,
		})
	}

	pub(crate) fn with_generation(mut self, generation: u64) -> Self {
		self.generation = generation;
		self
	}

	pub(crate) fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
		self.collision_policy = policy;
		self
	}

	pub fn inbox_path(&self) -> &Path {
		&self.inbox_path
	}

	/// Case-insensitive alias lookup
	pub fn resolve(&self, alias: &str) -> Option<&Path> {
		self.aliases
			.get(&alias.trim().to_lowercase())
			.map(PathBuf::as_path)
	}

	/// All aliases sorted by name, for display
	pub fn aliases(&self) -> Vec<(&str, &Path)> {
		let mut entries: Vec<_> = self
			.aliases
			.iter()
			.map(|(alias, path)| (alias.as_str(), path.as_path()))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(b.0));
		entries
	}

	pub fn alias_count(&self) -> usize {
		self.aliases.len()
	}

	pub fn collision_policy(&self) -> CollisionPolicy {
		self.collision_policy
	}

	pub fn source(&self) -> &Path {
		&self.source
	}

	pub fn loaded_at(&self) -> DateTime<Utc> {
		self.loaded_at
	}

	/// Monotonic load counter assigned by the store (1 for the first load)
	pub fn generation(&self) -> u64 {
		self.generation
	}
}
