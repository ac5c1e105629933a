/* src/tracker/error.rs */

use thiserror::Error;

use crate::persist::PersistError;
use crate::poll::WatchError;

/// Errors returned by the [`Tracker`](super::Tracker) lifecycle.
#[derive(Debug, Error)]
pub enum TrackerError {
	#[error("Snapshot not loaded yet. Call load() before watch().")]
	NotLoaded,

	#[error("Builder error: {0}")]
	Builder(String),

	#[error("Watch error: {0}")]
	Watch(#[from] WatchError),

	#[error("Persist error: {0}")]
	Persist(#[from] PersistError),
}
