use anyhow::Context;
use clap::Parser;
use delivery_car::{
	CollisionPolicy, ConfigStore, Console, Dispatcher, InventoryReporter, WatchSupervisor,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "delivery-car")]
#[command(
	about = "Watch an inbox directory and batch-move its files to destinations picked by alias"
)]
struct Cli {
	/// Path to the YAML configuration file
	#[arg(short, long, default_value = "delivery-guide-config.yaml")]
	config: PathBuf,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// What to do when a file already exists at the destination
	/// (overwrite, skip, keep-both); overrides the config file
	#[arg(long, value_name = "POLICY")]
	collision: Option<CollisionPolicy>,

	/// How long to let a burst of arrivals settle before reporting, in milliseconds
	#[arg(long, default_value_t = 100)]
	coalesce_ms: u64,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	// One worker: the background watcher. The command loop owns the main thread.
	let runtime = tokio::runtime::Builder::new_multi_thread()
		.worker_threads(1)
		.thread_name("inbox-watcher")
		.enable_all()
		.build()
		.context("Failed to start runtime")?;

	runtime.spawn(async {
		if tokio::signal::ctrl_c().await.is_ok() {
			info!("Interrupted, shutting down...");
			std::process::exit(0);
		}
	});

	let store = Arc::new(ConfigStore::new(&cli.config).with_collision_override(cli.collision));
	let console = Console::stdout();
	let reporter = InventoryReporter::new(Arc::clone(&store), console.clone());

	let loaded = store.reload().is_ok();
	if !loaded {
		warn!("Starting without a configuration; moves are unavailable until a reload succeeds");
	}

	let mut supervisor = WatchSupervisor::new(
		runtime.handle().clone(),
		reporter.clone(),
		Duration::from_millis(cli.coalesce_ms),
	);
	if let Err(e) = supervisor.sync() {
		error!(category = e.category(), "Could not start background monitor: {}", e);
	}

	let mut dispatcher = Dispatcher::new(reporter.clone()).with_supervisor(supervisor);
	dispatcher.print_welcome();
	if loaded {
		reporter.report();
	} else {
		console.line(format!(
			"[Warning] No usable configuration at {}; fix it and type 'reload'",
			cli.config.display()
		));
	}

	dispatcher.run(std::io::stdin().lock());

	if let Some(handle) = dispatcher.take_supervisor().and_then(|mut s| s.take()) {
		if let Err(e) = runtime.block_on(handle.stop()) {
			warn!("Background monitor did not stop cleanly: {}", e);
		}
	}
	runtime.shutdown_timeout(Duration::from_millis(500));

	Ok(())
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
	};

	// Logs go to stderr; stdout carries the interactive console
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
