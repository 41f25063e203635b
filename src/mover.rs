//! Batch relocation of inbox files into a destination directory

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CollisionPolicy;
use crate::error::{MoverError, Result};
use crate::inventory::InventoryFile;

/// A single file that could not be moved
#[derive(Debug)]
pub struct MoveFailure {
	pub source: PathBuf,
	pub error: io::Error,
}

/// Outcome of one batch move
#[derive(Debug)]
pub struct BatchMoveReport {
	pub destination: PathBuf,
	/// Final paths of the files that were moved
	pub moved: Vec<PathBuf>,
	/// Sources left in place because of `CollisionPolicy::Skip`
	pub skipped: Vec<PathBuf>,
	pub failed: Vec<MoveFailure>,
}

impl BatchMoveReport {
	fn new(destination: &Path) -> Self {
		Self {
			destination: destination.to_path_buf(),
			moved: Vec::new(),
			skipped: Vec::new(),
			failed: Vec::new(),
		}
	}

	pub fn moved_count(&self) -> usize {
		self.moved.len()
	}

	pub fn attempted(&self) -> usize {
		self.moved.len() + self.skipped.len() + self.failed.len()
	}

	pub fn is_complete(&self) -> bool {
		self.skipped.is_empty() && self.failed.is_empty()
	}
}

/// Move every file of the snapshot into `destination`.
///
/// The destination (and its parents) is created first; failing that is the
/// only error returned. After that each file is moved on its own: a failure is
/// recorded in the report and the rest of the batch still runs. Moved files are
/// never put back.
pub fn batch_move(
	files: &[InventoryFile], destination: &Path, policy: CollisionPolicy,
) -> Result<BatchMoveReport> {
	ensure_directory(destination)?;

	let mut report = BatchMoveReport::new(destination);
	for file in files {
		let target = destination.join(&file.name);

		let target = if target.exists() {
			match policy {
				CollisionPolicy::Overwrite => {
					warn!("Replacing existing file {}", target.display());
					target
				}
				CollisionPolicy::Skip => {
					info!("Skipping {}: already present in destination", file.name);
					report.skipped.push(file.path.clone());
					continue;
				}
				CollisionPolicy::KeepBoth => unique_destination(&target),
			}
		} else {
			target
		};

		match move_file(&file.path, &target) {
			Ok(()) => {
				debug!("Moved {} -> {}", file.path.display(), target.display());
				report.moved.push(target);
			}
			Err(error) => {
				warn!("Failed to move {}: {}", file.path.display(), error);
				report.failed.push(MoveFailure { source: file.path.clone(), error });
			}
		}
	}

	info!(
		"Moved {}/{} files to {}",
		report.moved_count(),
		files.len(),
		destination.display()
	);
	Ok(report)
}

/// Create `path` and its parents if it does not exist yet
pub fn ensure_directory(path: &Path) -> Result<()> {
	if path.is_dir() {
		return Ok(());
	}
	std::fs::create_dir_all(path).map_err(|cause| MoverError::DestinationUnavailable {
		path: path.to_path_buf(),
		cause,
	})
}

/// Rename in place; across filesystems fall back to copy then remove.
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
	match std::fs::rename(source, target) {
		Ok(()) => Ok(()),
		Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
			debug!("Cross-device move for {}, copying instead", source.display());
			std::fs::copy(source, target)?;
			std::fs::remove_file(source)
		}
		Err(e) => Err(e),
	}
}

/// `name.ext` -> `name (1).ext`, `name (2).ext`, ... whichever is free first
fn unique_destination(candidate: &Path) -> PathBuf {
	let stem = candidate
		.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "file".to_string());
	let extension = candidate
		.extension()
		.map(|e| format!(".{}", e.to_string_lossy()))
		.unwrap_or_default();

	(1..)
		.map(|n| candidate.with_file_name(format!("{stem} ({n}){extension}")))
		.find(|path| !path.exists())
		.unwrap_or_else(|| candidate.to_path_buf())
}
