use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
	Created,
	/// Anything else the backend reports; ignored by the watcher
	Other,
}

impl From<notify::EventKind> for NotificationKind {
	fn from(kind: notify::EventKind) -> Self {
		match kind {
			notify::EventKind::Create(_) => NotificationKind::Created,
			// Some backends report a file moved into the directory as a rename target
			notify::EventKind::Modify(notify::event::ModifyKind::Name(
				notify::event::RenameMode::To,
			)) => NotificationKind::Created,
			_ => NotificationKind::Other,
		}
	}
}

/// A single arrival in the inbox, as reported by the watch backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchNotification {
	pub id: Uuid,
	pub kind: NotificationKind,
	pub entry_name: String,
	pub path: PathBuf,
	pub timestamp: DateTime<Utc>,
}

impl WatchNotification {
	pub fn new(kind: NotificationKind, path: PathBuf) -> Self {
		let entry_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| path.display().to_string());

		Self { id: Uuid::new_v4(), kind, entry_name, path, timestamp: Utc::now() }
	}

	/// Expand one backend event into per-path notifications
	pub fn from_event(event: notify::Event) -> Vec<Self> {
		let kind = NotificationKind::from(event.kind);
		event
			.paths
			.into_iter()
			.map(|path| Self::new(kind, path))
			.collect()
	}

	pub fn is_created(&self) -> bool {
		self.kind == NotificationKind::Created
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}
}
