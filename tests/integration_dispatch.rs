// End-to-end tests of the command loop using scripted input

use delivery_car::Dispatcher;
use std::io::Cursor;

mod common;

#[test]
fn test_move_by_alias() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	workspace.add_inbox_files(&["a.png", "b.png"]);
	let (reporter, buffer) = workspace.reporter();

	let mut dispatcher = Dispatcher::new(reporter);
	dispatcher.run(Cursor::new("art\nexit\n"));

	let output = buffer.contents();
	assert!(output.contains("2 file(s) moved to"), "output was: {output}");
	assert!(workspace.inbox_names().is_empty());
	assert!(workspace.path("dest/art/a.png").is_file());
	assert!(workspace.path("dest/art/b.png").is_file());
}

#[test]
fn test_alias_lookup_ignores_case() {
	let workspace = common::Workspace::new(&[("Art", "dest/art")]);
	workspace.add_inbox_files(&["a.png"]);
	let (reporter, buffer) = workspace.reporter();

	Dispatcher::new(reporter).run(Cursor::new("  ART  \n"));

	assert!(buffer.contents().contains("1 file(s) moved to"));
	assert!(workspace.path("dest/art/a.png").is_file());
}

#[test]
fn test_unknown_alias_leaves_inbox_untouched() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	workspace.add_inbox_files(&["a.png", "b.png"]);
	let (reporter, buffer) = workspace.reporter();

	Dispatcher::new(reporter).run(Cursor::new("unknownalias\nquit\n"));

	assert!(buffer.contents().contains("Unknown alias: unknownalias"));
	assert_eq!(workspace.inbox_names(), vec!["a.png".to_string(), "b.png".to_string()]);
	assert!(!workspace.path("dest").exists());
}

#[test]
fn test_reload_then_move_to_new_alias() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	workspace.add_inbox_files(&["c.png"]);
	let (reporter, buffer) = workspace.reporter();
	let mut dispatcher = Dispatcher::new(reporter);

	// Before the edit the alias does not exist
	dispatcher.run(Cursor::new("new\n"));
	assert!(buffer.contents().contains("Unknown alias: new"));
	assert_eq!(workspace.inbox_names(), vec!["c.png".to_string()]);

	workspace.write_mappings(&[("art", "dest/art"), ("new", "dest/new")]);
	dispatcher.run(Cursor::new("reload\nnew\nexit\n"));

	let output = buffer.contents();
	assert!(output.contains("[Config] Reloaded 2 alias(es)"));
	assert!(output.contains("1 file(s) moved to"));
	assert!(workspace.path("dest/new/c.png").is_file());
}

#[test]
fn test_status_commands_report_count() {
	let workspace = common::Workspace::new(&[]);
	workspace.add_inbox_files(&["a.png", "b.png", "c.png"]);
	let (reporter, buffer) = workspace.reporter();

	Dispatcher::new(reporter).run(Cursor::new("check\nLIST\nls\n"));

	let output = buffer.contents();
	assert_eq!(output.matches("[Status] Inventory Update - Current file count: 3").count(), 3);
}

#[test]
fn test_failed_reload_keeps_working_configuration() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	workspace.add_inbox_files(&["a.png"]);
	let (reporter, buffer) = workspace.reporter();

	std::fs::write(&workspace.config, "delivery_car: [unterminated\n").unwrap();
	Dispatcher::new(reporter).run(Cursor::new("reload\nart\n"));

	let output = buffer.contents();
	assert!(output.contains("[Warning] Reload failed"));
	assert!(output.contains("1 file(s) moved to"));
}

#[test]
fn test_undecodable_line_does_not_end_session() {
	let workspace = common::Workspace::new(&[("art", "dest/art")]);
	workspace.add_inbox_files(&["a.png"]);
	let (reporter, buffer) = workspace.reporter();

	Dispatcher::new(reporter).run(Cursor::new(&b"\xff\xfe\nart\nexit\n"[..]));

	let output = buffer.contents();
	assert!(output.contains("[Warning] Ignored input that is not valid UTF-8"));
	assert!(output.contains("1 file(s) moved to"), "output was: {output}");
	assert!(workspace.inbox_names().is_empty());
	assert!(workspace.path("dest/art/a.png").is_file());
}

#[test]
fn test_alias_without_destination_is_unknown() {
	let workspace = common::Workspace::new(&[]);
	std::fs::write(
		&workspace.config,
		format!("delivery_car: '{}'\nmappings:\n  art:\n  blank: ''\n", workspace.inbox.display()),
	)
	.unwrap();
	workspace.add_inbox_files(&["a.png"]);
	let (reporter, buffer) = workspace.reporter();
	assert_eq!(reporter.store().resolve_destination("art"), None);

	Dispatcher::new(reporter).run(Cursor::new("art\nblank\n"));

	let output = buffer.contents();
	assert!(output.contains("Unknown alias: art"));
	assert!(output.contains("Unknown alias: blank"));
	assert!(!output.contains("moved to"));
	assert_eq!(workspace.inbox_names(), vec!["a.png".to_string()]);
}
