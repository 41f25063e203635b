//! Shared operator console
//!
//! The watcher task and the command loop both write to the same terminal.
//! Every write goes through one mutex so a notification never lands in the
//! middle of a prompt or another report.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

pub const PROMPT: &str = ">> ";

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct Console {
	out: SharedWriter,
	prompt: String,
}

impl std::fmt::Debug for Console {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Console").field("prompt", &self.prompt).finish()
	}
}

impl Console {
	pub fn stdout() -> Self {
		Self::with_writer(io::stdout())
	}

	pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
		Self { out: Arc::new(Mutex::new(Box::new(writer))), prompt: PROMPT.to_string() }
	}

	pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = prompt.into();
		self
	}

	fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
		// A panic while printing must not silence the console for good
		self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Print the prompt without a trailing newline
	pub fn prompt(&self) {
		let mut out = self.lock();
		let result = write!(out, "{}", self.prompt).and_then(|_| out.flush());
		report_write_error(result);
	}

	/// Print lines as part of the command/response flow
	pub fn lines<I, S>(&self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut out = self.lock();
		let result = write_lines(&mut **out, lines).and_then(|_| out.flush());
		report_write_error(result);
	}

	pub fn line(&self, line: impl AsRef<str>) {
		self.lines([line]);
	}

	/// Print asynchronous output while the operator may be sitting at the prompt.
	///
	/// Clears the current prompt line, prints the lines, then redraws the
	/// prompt, all under one lock.
	pub fn interject<I, S>(&self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut out = self.lock();
		let result = write!(out, "\r")
			.and_then(|_| write_lines(&mut **out, lines))
			.and_then(|_| write!(out, "{}", self.prompt))
			.and_then(|_| out.flush());
		report_write_error(result);
	}
}

fn write_lines<I, S>(out: &mut dyn Write, lines: I) -> io::Result<()>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	for line in lines {
		writeln!(out, "{}", line.as_ref())?;
	}
	Ok(())
}

fn report_write_error(result: io::Result<()>) {
	if let Err(e) = result {
		warn!("Console write failed: {}", e);
	}
}

/// In-memory writer that can be inspected after the fact; used by tests.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
	inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contents(&self) -> String {
		let bytes = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		String::from_utf8_lossy(&bytes).into_owned()
	}
}

impl Write for CaptureBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let mut bytes = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		bytes.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
