//! Hand a folder or URL to the desktop environment

use std::ffi::OsStr;
use std::io;
use std::process::Command;

/// Something that can show a folder or URL to the operator
pub trait Opener: Send + Sync {
	fn open(&self, target: &OsStr) -> io::Result<()>;
}

/// Uses the platform's default handler (`open`, `explorer`, `xdg-open`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
	fn open(&self, target: &OsStr) -> io::Result<()> {
		launch(target)
	}
}

#[cfg(target_os = "macos")]
fn launch(target: &OsStr) -> io::Result<()> {
	let status = Command::new("open").arg(target).status()?;
	check_status("open", status)
}

// explorer exits with 1 even when it succeeds
#[cfg(target_os = "windows")]
fn launch(target: &OsStr) -> io::Result<()> {
	Command::new("explorer").arg(target).status()?;
	Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn launch(target: &OsStr) -> io::Result<()> {
	let status = Command::new("xdg-open").arg(target).status()?;
	check_status("xdg-open", status)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn launch(_target: &OsStr) -> io::Result<()> {
	Err(io::Error::new(
		io::ErrorKind::Unsupported,
		"Opening folders is not supported on this platform",
	))
}

#[cfg(unix)]
fn check_status(program: &str, status: std::process::ExitStatus) -> io::Result<()> {
	if status.success() {
		Ok(())
	} else {
		Err(io::Error::other(format!("{program} failed: {status}")))
	}
}
