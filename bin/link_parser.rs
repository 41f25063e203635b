//! Interactive helper: paste a saved image's filename, get its source URL back
//! and open it in the browser.

use clap::Parser;
use delivery_car::dispatch::read_line;
use delivery_car::link_parser;
use delivery_car::{Console, Opener, SystemOpener};
use std::ffi::OsStr;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "link-parser")]
#[command(about = "Rebuild source URLs from saved image filenames")]
struct Cli {
	/// Print the URL without opening it
	#[arg(long)]
	no_open: bool,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
		)
		.with_writer(std::io::stderr)
		.init();

	let console = Console::stdout().with_prompt("url> ");
	console.lines([
		"=== Link Parser ===".to_string(),
		"Paste a filename to rebuild its URL ('exit' to quit)".to_string(),
	]);

	let mut input_lines = std::io::stdin().lock();
	let mut buf = Vec::new();
	loop {
		console.prompt();
		let line = match read_line(&mut input_lines, &mut buf) {
			Ok(Some(line)) => line,
			Ok(None) => break,
			Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
				warn!("Ignoring input line that is not valid UTF-8: {}", e);
				console.line("[Warning] Ignored input that is not valid UTF-8");
				continue;
			}
			Err(e) => return Err(e.into()),
		};
		let input = line.trim();

		if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
			break;
		}
		if input.is_empty() {
			continue;
		}

		let url = link_parser::parse(input);
		if url.is_empty() {
			console.line("[Link] No known platform matches this name");
			continue;
		}

		debug!(
			strategy = link_parser::matching_strategy(input).unwrap_or("unknown"),
			"Parsed {} -> {}", input, url
		);
		console.line(format!("[Link] {url}"));

		if !cli.no_open {
			match SystemOpener.open(OsStr::new(&url)) {
				Ok(()) => info!("Opened {}", url),
				Err(e) => error!("Failed to open {}: {}", url, e),
			}
		}
	}

	Ok(())
}
