//! Inbox inventory: a fresh directory listing every time, never cached.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::console::Console;
use crate::error::{MoverError, Result};

/// A regular file that was present in the inbox at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFile {
	pub name: String,
	pub size_bytes: Option<u64>,
	pub path: PathBuf,
}

/// List the regular files directly inside `directory`.
///
/// Symlinks and subdirectories are excluded. Entries come back in whatever
/// order the filesystem enumerates them.
pub fn scan(directory: &Path) -> Result<Vec<InventoryFile>> {
	let metadata = std::fs::metadata(directory).map_err(|e| match e.kind() {
		std::io::ErrorKind::NotFound => MoverError::invalid_path(directory),
		_ => MoverError::Io(e),
	})?;
	if !metadata.is_dir() {
		return Err(MoverError::not_a_directory(directory));
	}

	let mut files = Vec::new();
	for entry in std::fs::read_dir(directory)? {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				// Entry vanished or became unreadable mid-listing
				debug!("Skipping unreadable entry in {}: {}", directory.display(), e);
				continue;
			}
		};

		// DirEntry::file_type does not follow symlinks
		match entry.file_type() {
			Ok(file_type) if file_type.is_file() => {}
			_ => continue,
		}

		let size_bytes = entry.metadata().ok().map(|m| m.len());
		files.push(InventoryFile {
			name: entry.file_name().to_string_lossy().into_owned(),
			size_bytes,
			path: entry.path(),
		});
	}

	Ok(files)
}

/// Prints the inbox file count on the shared console.
///
/// Used by the watcher after a burst of arrivals, by the status built-in and
/// at startup. The inbox path is resolved from the store at the moment of
/// use so a reload takes effect immediately.
#[derive(Debug, Clone)]
pub struct InventoryReporter {
	store: Arc<ConfigStore>,
	console: Console,
}

impl InventoryReporter {
	pub fn new(store: Arc<ConfigStore>, console: Console) -> Self {
		Self { store, console }
	}

	/// Scan the inbox and return the count; a failed scan counts as zero.
	pub fn count(&self) -> usize {
		let Some(inbox) = self.store.inbox_path() else {
			warn!("Inventory unavailable: no configuration loaded");
			return 0;
		};

		match scan(&inbox) {
			Ok(files) => files.len(),
			Err(e) => {
				warn!(
					category = e.category(),
					"Could not scan delivery car {}: {}",
					inbox.display(),
					e
				);
				0
			}
		}
	}

	pub fn status_line(&self) -> String {
		format!("[Status] Inventory Update - Current file count: {}", self.count())
	}

	/// Report as part of the command flow
	pub fn report(&self) {
		self.console.line(self.status_line());
	}

	/// Report from the watcher, together with the arrival lines, in one console write
	pub fn report_arrivals(&self, arrivals: &[String]) {
		let mut lines = arrivals.to_vec();
		lines.push(self.status_line());
		self.console.interject(lines);
	}

	pub fn console(&self) -> &Console {
		&self.console
	}

	pub fn store(&self) -> &Arc<ConfigStore> {
		&self.store
	}
}
