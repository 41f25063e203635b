// Integration tests for configuration loading and reload semantics

use delivery_car::{ConfigError, ConfigStore};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

mod common;

#[test]
fn test_aliases_resolve_case_insensitively() {
	let workspace = common::Workspace::new(&[("Art", "dest/art"), ("photos", "dest/photos")]);
	let store = ConfigStore::new(&workspace.config);
	store.reload().unwrap();

	let expected = workspace.path("dest/art");
	for spelling in ["art", "ART", "Art", "aRt"] {
		assert_eq!(store.resolve_destination(spelling), Some(expected.clone()));
	}
	assert_eq!(store.resolve_destination("PHOTOS"), Some(workspace.path("dest/photos")));
	assert_eq!(store.resolve_destination("music"), None);
}

#[test]
fn test_reload_picks_up_edits() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	let store = ConfigStore::new(&workspace.config);
	let first = store.reload().unwrap();
	assert!(store.resolve_destination("new").is_none());

	workspace.write_mappings(&[("art", "dest/art"), ("new", "dest/new")]);
	let second = store.reload().unwrap();

	assert!(second.generation() > first.generation());
	assert_eq!(store.resolve_destination("new"), Some(workspace.path("dest/new")));
	// The old snapshot is untouched
	assert!(first.resolve("new").is_none());
}

#[test]
fn test_broken_reload_keeps_previous_snapshot() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	let store = ConfigStore::new(&workspace.config);
	store.reload().unwrap();

	std::fs::write(&workspace.config, "mappings:\n  art: /elsewhere\n").unwrap();
	assert!(matches!(store.reload(), Err(ConfigError::MissingInbox)));
	assert_eq!(store.inbox_path(), Some(workspace.inbox.clone()));
	assert_eq!(store.resolve_destination("art"), Some(workspace.path("dest/art")));

	std::fs::remove_file(&workspace.config).unwrap();
	assert!(matches!(store.reload(), Err(ConfigError::NotFound { .. })));
	assert!(store.is_loaded());
}

fn write_variant(dir: &Path, name: &str) -> PathBuf {
	let config = dir.join(format!("{name}.yaml"));
	let inbox = dir.join(name).join("inbox");
	let destination = dir.join(name).join("dest");
	common::write_config(&config, &inbox, &[("shared", destination.as_path())]);
	config
}

#[test]
fn test_readers_never_observe_mixed_snapshots() {
	let temp_dir = common::setup_temp_dir();
	let variant_a = write_variant(temp_dir.path(), "a");
	let variant_b = write_variant(temp_dir.path(), "b");

	let store = Arc::new(ConfigStore::new(&variant_a));
	store.reload().unwrap();

	let done = Arc::new(AtomicBool::new(false));
	let readers: Vec<_> = (0..4)
		.map(|_| {
			let store = Arc::clone(&store);
			let done = Arc::clone(&done);
			thread::spawn(move || {
				let mut observed = 0usize;
				while !done.load(Ordering::SeqCst) {
					let settings = store.snapshot().expect("store stays loaded");
					let inbox_root = settings.inbox_path().parent().unwrap().to_path_buf();
					let destination = settings.resolve("shared").expect("alias in every variant");
					assert_eq!(destination.parent().unwrap(), inbox_root);
					observed += 1;
				}
				observed
			})
		})
		.collect();

	for round in 0..200 {
		let source = if round % 2 == 0 { &variant_b } else { &variant_a };
		store.load(source).unwrap();
	}
	done.store(true, Ordering::SeqCst);

	for reader in readers {
		let observed = reader.join().expect("reader saw a consistent snapshot");
		assert!(observed > 0);
	}
}
