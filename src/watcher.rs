use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{MoverError, Result};
use crate::events::WatchNotification;
use crate::inventory::InventoryReporter;

pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct WatcherConfig {
	pub path: PathBuf,
	/// How long to let a burst settle after the first event before draining
	pub coalesce_window: Duration,
}

impl WatcherConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), coalesce_window: DEFAULT_COALESCE_WINDOW }
	}

	pub fn with_coalesce_window(mut self, window: Duration) -> Self {
		self.coalesce_window = window;
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
	Idle,
	/// Waiting for the next filesystem event
	Armed,
	/// Collecting a burst of events
	Draining,
	Stopped,
}

type EventResult = notify::Result<Event>;

/// Handle to a running watcher task.
///
/// Dropping the handle cancels the watcher; `stop` cancels and waits for it.
pub struct WatcherHandle {
	path: PathBuf,
	stop_tx: Option<oneshot::Sender<()>>,
	state_rx: watch::Receiver<WatcherState>,
	task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn state(&self) -> WatcherState {
		*self.state_rx.borrow()
	}

	pub fn is_running(&self) -> bool {
		self.state() != WatcherState::Stopped
	}

	/// Wait until the watcher reaches `state`. Returns false if the task went
	/// away first.
	pub async fn wait_for_state(&mut self, state: WatcherState) -> bool {
		self.state_rx.wait_for(|current| *current == state).await.is_ok()
	}

	/// Ask the watcher to stop without waiting for it
	pub fn cancel(&mut self) {
		if let Some(stop_tx) = self.stop_tx.take() {
			// The task may already be gone after a watch failure
			let _ = stop_tx.send(());
		}
	}

	/// Cancel the watcher and wait for its task to finish
	pub async fn stop(mut self) -> Result<()> {
		self.cancel();
		if let Some(task) = self.task.take() {
			task.await.map_err(|e| {
				error!("Watcher task failed while stopping: {}", e);
				MoverError::StopSignal
			})?;
		}
		Ok(())
	}
}

impl Drop for WatcherHandle {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Start watching `config.path` for new entries.
///
/// Must be called from within a tokio runtime. The backend watch is created
/// here so setup failures are returned to the caller; the event loop itself
/// runs as a spawned task that owns the backend and releases it on exit.
pub fn start(config: WatcherConfig, reporter: InventoryReporter) -> Result<WatcherHandle> {
	let path = config.path.clone();
	if !path.exists() {
		return Err(MoverError::invalid_path(&path));
	}
	if !path.is_dir() {
		return Err(MoverError::not_a_directory(&path));
	}

	let (event_tx, event_rx) = mpsc::unbounded_channel();
	let mut watcher = RecommendedWatcher::new(
		move |result: EventResult| {
			// Receiver is gone once the loop has exited
			let _ = event_tx.send(result);
		},
		Config::default(),
	)?;
	watcher.watch(&path, RecursiveMode::NonRecursive)?;

	info!("Watching delivery car: {}", path.display());
	Ok(spawn_loop(watcher, event_rx, config, reporter))
}

/// Spawn the event loop. `guard` is whatever keeps the event source alive.
fn spawn_loop<G: Send + 'static>(
	guard: G, events: mpsc::UnboundedReceiver<EventResult>, config: WatcherConfig,
	reporter: InventoryReporter,
) -> WatcherHandle {
	let (stop_tx, stop_rx) = oneshot::channel();
	let (state_tx, state_rx) = watch::channel(WatcherState::Idle);
	let path = config.path.clone();

	let watch_loop = WatchLoop { events, coalesce_window: config.coalesce_window, reporter };
	let task = tokio::spawn(async move {
		let _guard = guard;
		match watch_loop.run(stop_rx, &state_tx).await {
			Ok(()) => info!("Background monitor stopped"),
			Err(e) => error!(
				category = e.category(),
				"Background monitor encountered an unexpected failure: {}", e
			),
		}
		state_tx.send_replace(WatcherState::Stopped);
	});

	WatcherHandle { path, stop_tx: Some(stop_tx), state_rx, task: Some(task) }
}

struct WatchLoop {
	events: mpsc::UnboundedReceiver<EventResult>,
	coalesce_window: Duration,
	reporter: InventoryReporter,
}

impl WatchLoop {
	async fn run(
		mut self, mut stop: oneshot::Receiver<()>, state: &watch::Sender<WatcherState>,
	) -> Result<()> {
		loop {
			state.send_replace(WatcherState::Armed);

			let first = tokio::select! {
				_ = &mut stop => {
					debug!("Watcher cancelled while armed");
					return Ok(());
				}
				next = self.events.recv() => match next {
					Some(result) => result,
					None => {
						warn!("Watch event channel closed");
						return Ok(());
					}
				},
			};

			state.send_replace(WatcherState::Draining);
			if !self.coalesce_window.is_zero() {
				tokio::select! {
					_ = &mut stop => {
						debug!("Watcher cancelled while draining");
						return Ok(());
					}
					_ = tokio::time::sleep(self.coalesce_window) => {}
				}
			}

			let mut batch = vec![first];
			while let Ok(next) = self.events.try_recv() {
				batch.push(next);
			}

			process_batch(batch, &self.reporter)?;
		}
	}
}

/// Turn one drained burst into console output.
///
/// Prints one line per created entry and, if anything arrived, a single
/// inventory count. A backend error is returned after the arrivals it was
/// queued with have been reported.
fn process_batch(batch: Vec<EventResult>, reporter: &InventoryReporter) -> Result<usize> {
	let mut arrivals = Vec::new();
	let mut failure = None;

	for result in batch {
		let event = match result {
			Ok(event) => event,
			Err(e) => {
				failure.get_or_insert(e);
				continue;
			}
		};

		for notification in WatchNotification::from_event(event) {
			if let Ok(json) = notification.to_json() {
				debug!("Watch notification: {}", json);
			}
			if notification.is_created() {
				arrivals.push(format!(
					"[Notification] New asset detected: {}",
					notification.entry_name
				));
			}
		}
	}

	if !arrivals.is_empty() {
		reporter.report_arrivals(&arrivals);
	}

	match failure {
		Some(e) => Err(e.into()),
		None => Ok(arrivals.len()),
	}
}

/// Keeps exactly one watcher pointed at the inbox of the current configuration.
pub struct WatchSupervisor {
	runtime: tokio::runtime::Handle,
	reporter: InventoryReporter,
	coalesce_window: Duration,
	current: Option<WatcherHandle>,
}

impl WatchSupervisor {
	pub fn new(
		runtime: tokio::runtime::Handle, reporter: InventoryReporter, coalesce_window: Duration,
	) -> Self {
		Self { runtime, reporter, coalesce_window, current: None }
	}

	/// Start or restart the watcher if the configured inbox is not being
	/// watched. Returns true when a new watcher was started.
	pub fn sync(&mut self) -> Result<bool> {
		let Some(inbox) = self.reporter.store().inbox_path() else {
			return Ok(false);
		};

		if let Some(current) = &self.current {
			if current.path() == inbox.as_path() && current.is_running() {
				return Ok(false);
			}
		}

		if let Some(mut previous) = self.current.take() {
			info!("Releasing watch on {}", previous.path().display());
			previous.cancel();
		}

		let _runtime = self.runtime.enter();
		let config = WatcherConfig::new(inbox).with_coalesce_window(self.coalesce_window);
		self.current = Some(start(config, self.reporter.clone())?);
		Ok(true)
	}

	pub fn current(&self) -> Option<&WatcherHandle> {
		self.current.as_ref()
	}

	pub fn take(&mut self) -> Option<WatcherHandle> {
		self.current.take()
	}
}
