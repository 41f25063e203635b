use arc_swap::ArcSwapOption;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::error::ConfigError;
use super::settings::{CollisionPolicy, Settings};

/// Holder of the current configuration snapshot.
///
/// Wraps an `ArcSwapOption` so a reload publishes a complete new `Settings`
/// with a single pointer swap. Readers take a snapshot and keep using it for
/// the whole operation; they never hold a lock and never see a half-applied
/// reload.
pub struct ConfigStore {
	source: PathBuf,
	current: ArcSwapOption<Settings>,
	generation: AtomicU64,
	collision_override: Option<CollisionPolicy>,
}

impl fmt::Debug for ConfigStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigStore")
			.field("source", &self.source)
			.field("current", &self.snapshot())
			.finish()
	}
}

impl ConfigStore {
	/// Create an empty store bound to its source file. Nothing is loaded yet.
	pub fn new(source: impl Into<PathBuf>) -> Self {
		Self {
			source: source.into(),
			current: ArcSwapOption::empty(),
			generation: AtomicU64::new(0),
			collision_override: None,
		}
	}

	/// Force a collision policy regardless of what the file says
	pub fn with_collision_override(mut self, policy: Option<CollisionPolicy>) -> Self {
		self.collision_override = policy;
		self
	}

	/// The file `reload` reads from
	pub fn source(&self) -> &Path {
		&self.source
	}

	/// Read and parse `path`, then publish the result atomically.
	///
	/// On failure the previously published snapshot (if any) stays active.
	pub fn load(&self, path: &Path) -> Result<Arc<Settings>, ConfigError> {
		match self.read_settings(path) {
			Ok(settings) => {
				let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
				let mut settings = settings.with_generation(generation);
				if let Some(policy) = self.collision_override {
					settings = settings.with_collision_policy(policy);
				}

				let settings = Arc::new(settings);
				self.current.store(Some(Arc::clone(&settings)));

				info!(
					"Configuration loaded from {} (generation {}, {} aliases, collision policy: {})",
					path.display(),
					generation,
					settings.alias_count(),
					settings.collision_policy()
				);
				Ok(settings)
			}
			Err(e) => {
				error!(
					category = e.category(),
					"Configuration load failed, keeping previous configuration: {}", e
				);
				Err(e)
			}
		}
	}

	/// Load again from the source the store was created with
	pub fn reload(&self) -> Result<Arc<Settings>, ConfigError> {
		debug!("Reloading configuration from {}", self.source.display());
		self.load(&self.source)
	}

	fn read_settings(&self, path: &Path) -> Result<Settings, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
			std::io::ErrorKind::NotFound => ConfigError::NotFound { path: path.to_path_buf() },
			_ => ConfigError::Read { path: path.to_path_buf(), source: e },
		})?;
		Settings::from_yaml_str(&content, path)
	}

	/// The current snapshot, or `None` before the first successful load
	pub fn snapshot(&self) -> Option<Arc<Settings>> {
		self.current.load_full()
	}

	pub fn inbox_path(&self) -> Option<PathBuf> {
		self.snapshot()
			.map(|settings| settings.inbox_path().to_path_buf())
	}

	/// Case-insensitive lookup against the current snapshot
	pub fn resolve_destination(&self, alias: &str) -> Option<PathBuf> {
		self.snapshot()
			.and_then(|settings| settings.resolve(alias).map(Path::to_path_buf))
	}

	pub fn is_loaded(&self) -> bool {
		self.current.load().is_some()
	}
}
