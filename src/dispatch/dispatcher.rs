use std::io::{self, BufRead};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::command::{classify, Builtin, Command};
use super::input::read_line;
use super::opener::{Opener, SystemOpener};
use crate::config::ConfigStore;
use crate::console::Console;
use crate::error::{MoverError, Result};
use crate::inventory::{scan, InventoryReporter};
use crate::mover::{batch_move, ensure_directory};
use crate::watcher::WatchSupervisor;

/// Consecutive read failures after which the loop gives up on its input
const MAX_READ_ERRORS: u32 = 3;

/// Whether the read loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Exit,
}

/// The foreground read-evaluate loop.
///
/// Every command reads the configuration through a fresh snapshot and every
/// failure is logged and reported on the console; nothing but `exit`, `quit`
/// or the end of input leaves the loop.
pub struct Dispatcher {
	store: Arc<ConfigStore>,
	reporter: InventoryReporter,
	console: Console,
	opener: Box<dyn Opener>,
	supervisor: Option<WatchSupervisor>,
}

impl Dispatcher {
	pub fn new(reporter: InventoryReporter) -> Self {
		Self {
			store: Arc::clone(reporter.store()),
			console: reporter.console().clone(),
			reporter,
			opener: Box::new(SystemOpener),
			supervisor: None,
		}
	}

	pub fn with_opener(mut self, opener: impl Opener + 'static) -> Self {
		self.opener = Box::new(opener);
		self
	}

	/// Let `reload` start or move the background watcher
	pub fn with_supervisor(mut self, supervisor: WatchSupervisor) -> Self {
		self.supervisor = Some(supervisor);
		self
	}

	pub fn take_supervisor(&mut self) -> Option<WatchSupervisor> {
		self.supervisor.take()
	}

	pub fn print_welcome(&self) {
		let rule = "=".repeat(61);
		let mut lines = vec![
			rule.clone(),
			"              Gallery Organizer Engine Active".to_string(),
			rule,
		];
		lines.extend(user_guide());
		lines.push(String::new());
		self.console.lines(lines);
	}

	/// Read commands until exit or end of input.
	///
	/// Undecodable lines are skipped with a warning. Other read errors end
	/// the loop only after `MAX_READ_ERRORS` in a row.
	pub fn run(&mut self, mut input: impl BufRead) {
		let mut buf = Vec::new();
		let mut read_errors = 0;
		loop {
			self.console.prompt();
			let line = match read_line(&mut input, &mut buf) {
				Ok(line) => {
					read_errors = 0;
					line
				}
				Err(e) if e.kind() == io::ErrorKind::InvalidData => {
					warn!("Ignoring input line that is not valid UTF-8: {}", e);
					self.console.line("[Warning] Ignored input that is not valid UTF-8");
					continue;
				}
				Err(e) => {
					read_errors += 1;
					error!(
						"System I/O error while reading input ({}/{}): {}",
						read_errors, MAX_READ_ERRORS, e
					);
					if read_errors < MAX_READ_ERRORS {
						self.console.line(format!("[Warning] Could not read input: {e}"));
						continue;
					}
					None
				}
			};

			if self.dispatch(classify(line.as_deref())) == Flow::Exit {
				break;
			}
		}
	}

	pub fn dispatch(&mut self, command: Command) -> Flow {
		let result = match command {
			Command::Exit => {
				info!("Terminating application...");
				return Flow::Exit;
			}
			Command::Empty => Ok(()),
			Command::Reload => {
				self.reload();
				Ok(())
			}
			Command::OpenFolder(alias) => self.open_folder(&alias),
			Command::Builtin(builtin) => self.run_builtin(builtin),
			Command::Move(alias) => self.move_to(&alias),
		};

		if let Err(e) = result {
			if e.is_recoverable() {
				warn!(category = e.category(), "Command failed: {}", e);
			} else {
				error!(category = e.category(), "Command failed: {}", e);
			}
			self.console.line(format!("[Error] {e}"));
		}
		Flow::Continue
	}

	fn reload(&mut self) {
		info!("Reloading configuration from {}", self.store.source().display());
		let settings = match self.store.reload() {
			Ok(settings) => settings,
			Err(e) => {
				self.console.line(format!(
					"[Warning] Reload failed, keeping previous configuration: {e}"
				));
				return;
			}
		};

		self.console.line(format!(
			"[Config] Reloaded {} alias(es); delivery car: {}",
			settings.alias_count(),
			settings.inbox_path().display()
		));

		if let Some(supervisor) = self.supervisor.as_mut() {
			match supervisor.sync() {
				Ok(true) => self
					.console
					.line(format!("[Config] Now watching {}", settings.inbox_path().display())),
				Ok(false) => {}
				Err(e) => {
					error!(category = e.category(), "Could not watch delivery car: {}", e);
					self.console.line(format!("[Warning] Could not watch delivery car: {e}"));
				}
			}
		}
	}

	fn open_folder(&self, alias: &str) -> Result<()> {
		if alias.is_empty() {
			warn!("Cannot open folder: no alias given");
			self.console.line("[Warning] Usage: open -s <alias>");
			return Ok(());
		}

		let Some(path) = self.store.resolve_destination(alias) else {
			warn!("Cannot open folder: Alias [{}] not recognized.", alias);
			self.console.line(format!("[Warning] Unknown alias: {alias}"));
			return Ok(());
		};

		ensure_directory(&path)?;
		match self.opener.open(path.as_os_str()) {
			Ok(()) => {
				info!("System explorer triggered for path: {}", path.display());
				self.console.line(format!("[Open] {}", path.display()));
			}
			Err(e) => {
				error!("Failed to launch system explorer for {}: {}", path.display(), e);
				self.console.line(format!("[Warning] Could not open {}: {e}", path.display()));
			}
		}
		Ok(())
	}

	fn run_builtin(&self, builtin: Builtin) -> Result<()> {
		match builtin {
			Builtin::Status => self.reporter.report(),
			Builtin::Help => self.console.lines(user_guide()),
			Builtin::Aliases => {
				let settings = self.store.snapshot().ok_or(MoverError::NotInitialized)?;
				let mut lines = vec![format!(
					"[Config] {} alias(es) from {} (loaded {}), collision policy: {}",
					settings.alias_count(),
					settings.source().display(),
					settings.loaded_at().with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
					settings.collision_policy()
				)];
				lines.extend(
					settings
						.aliases()
						.into_iter()
						.map(|(alias, path)| format!("  {alias:<16} -> {}", path.display())),
				);
				self.console.lines(lines);
			}
		}
		Ok(())
	}

	fn move_to(&self, alias: &str) -> Result<()> {
		let settings = self.store.snapshot().ok_or(MoverError::NotInitialized)?;

		let Some(destination) = settings.resolve(alias) else {
			warn!("Invalid alias [{}]: No mapping exists in configuration.", alias);
			self.console.line(format!("[Warning] Unknown alias: {alias}"));
			return Ok(());
		};

		// Fresh snapshot taken right before the move
		let files = scan(settings.inbox_path())?;
		if files.is_empty() {
			info!("No files found in delivery car. Movement sequence aborted.");
			self.console
				.line("[Move] No files found in delivery car. Movement sequence aborted.");
			return Ok(());
		}

		let report = batch_move(&files, destination, settings.collision_policy())?;

		let mut lines = vec![format!(
			"[Move] Success: {} file(s) moved to {}",
			report.moved_count(),
			destination.display()
		)];
		lines.extend(
			report
				.skipped
				.iter()
				.map(|path| format!("[Move] Skipped (already exists): {}", path.display())),
		);
		lines.extend(
			report
				.failed
				.iter()
				.map(|failure| format!("[Move] Failed: {} ({})", failure.source.display(), failure.error)),
		);
		self.console.lines(lines);
		Ok(())
	}
}

/// The command summary shown at startup and by `help`
pub fn user_guide() -> Vec<String> {
	[
		"User Guide:",
		"  [alias]           -> Batch move files to destination",
		"  open -s [alias]   -> Open folder in file explorer",
		"  check | list | ls -> Show current file count",
		"  aliases           -> List configured aliases",
		"  reload            -> Refresh configuration mappings",
		"  help              -> Show this guide",
		"  exit | quit       -> Terminate the application",
	]
	.into_iter()
	.map(String::from)
	.collect()
}
