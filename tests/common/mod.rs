//! Common test utilities for the delivery-car library

#![allow(dead_code)]

use delivery_car::{CaptureBuffer, ConfigStore, Console, InventoryReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn setup_temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temp directory")
}

/// Create a test file with content
pub fn create_test_file(path: &Path, content: &str) -> std::io::Result<()> {
	std::fs::write(path, content)
}

/// Create multiple test files for testing
pub fn create_test_files(dir: &Path, count: usize) -> std::io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for i in 0..count {
		let file_path = dir.join(format!("test_file_{i}.txt"));
		create_test_file(&file_path, &format!("Content for file {i}"))?;
		files.push(file_path);
	}
	Ok(files)
}

/// Write a YAML config with the given inbox and `(alias, destination)` pairs
pub fn write_config(path: &Path, inbox: &Path, mappings: &[(&str, &Path)]) {
	let mut yaml = format!("delivery_car: '{}'\nmappings:\n", inbox.display());
	for (alias, destination) in mappings {
		yaml.push_str(&format!("  {alias}: '{}'\n", destination.display()));
	}
	std::fs::write(path, yaml).expect("Failed to write config");
}

/// A temp workspace with an inbox directory and a config file pointing at it
pub struct Workspace {
	pub dir: TempDir,
	pub inbox: PathBuf,
	pub config: PathBuf,
}

impl Workspace {
	pub fn new(mappings: &[(&str, &str)]) -> Self {
		let dir = setup_temp_dir();
		let inbox = dir.path().join("inbox");
		std::fs::create_dir(&inbox).expect("Failed to create inbox");
		let config = dir.path().join("delivery-guide-config.yaml");

		let workspace = Self { dir, inbox, config };
		workspace.write_mappings(mappings);
		workspace
	}

	/// Destinations are given relative to the workspace root
	pub fn write_mappings(&self, mappings: &[(&str, &str)]) {
		let resolved: Vec<(&str, PathBuf)> = mappings
			.iter()
			.map(|(alias, relative)| (*alias, self.dir.path().join(relative)))
			.collect();
		let pairs: Vec<(&str, &Path)> =
			resolved.iter().map(|(alias, path)| (*alias, path.as_path())).collect();
		write_config(&self.config, &self.inbox, &pairs);
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.dir.path().join(relative)
	}

	pub fn add_inbox_files(&self, names: &[&str]) {
		for name in names {
			create_test_file(&self.inbox.join(name), name).expect("Failed to create inbox file");
		}
	}

	pub fn inbox_names(&self) -> Vec<String> {
		let mut names: Vec<String> = std::fs::read_dir(&self.inbox)
			.expect("Failed to read inbox")
			.filter_map(|entry| entry.ok())
			.map(|entry| entry.file_name().to_string_lossy().into_owned())
			.collect();
		names.sort();
		names
	}

	/// A loaded store plus a reporter writing into a capture buffer
	pub fn reporter(&self) -> (InventoryReporter, CaptureBuffer) {
		let store = Arc::new(ConfigStore::new(&self.config));
		store.reload().expect("Workspace config should load");
		let buffer = CaptureBuffer::new();
		let reporter = InventoryReporter::new(store, Console::with_writer(buffer.clone()));
		(reporter, buffer)
	}
}

/// Poll `buffer` until `predicate` holds or `timeout` elapses
pub async fn wait_for_output(
	buffer: &CaptureBuffer, timeout: Duration, predicate: impl Fn(&str) -> bool,
) -> bool {
	let deadline = tokio::time::Instant::now() + timeout;
	while tokio::time::Instant::now() < deadline {
		if predicate(&buffer.contents()) {
			return true;
		}
		tokio::time::sleep(Duration::from_millis(25)).await;
	}
	predicate(&buffer.contents())
}
