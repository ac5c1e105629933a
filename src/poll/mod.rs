/* src/poll/mod.rs */

//!
//! Poll scheduler: one repeating fetch → reconcile → persist task per
//! collection key.
//!
//! Cycles for one key never overlap. A tick that fires while a cycle is
//! still running is skipped, and so is a manual [`Poller::poll_now`]. A
//! failed or timed-out fetch leaves the snapshot untouched and the task
//! keeps running.

mod group;
mod source;
mod task;
mod worker;

pub use group::Poller;
pub use source::{FnSource, source_fn};
use task::PollTask;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::{RawItem, ReconcileReport};
use crate::persist::PersistError;

/// Errors raised by a remote source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
	#[error("network error: {0}")]
	Network(String),

	#[error("timed out after {0:?}")]
	Timeout(Duration),

	#[error("unexpected response status {0}")]
	Status(u16),

	/// The session expired (HTTP 401).
	#[error("unauthorized")]
	Unauthorized,

	/// The API answered but reported a failure in its envelope.
	#[error("rejected by remote: {0}")]
	Rejected(String),
}

/// Errors reported to the error callback. None of them stop a poll task.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
	#[error("fetch failed for '{collection}': {source}")]
	Fetch {
		collection: String,
		#[source]
		source: FetchError,
	},

	#[error("persist failed: {0}")]
	Persist(#[from] PersistError),

	#[error("invalid poll config: {0}")]
	Config(String),
}

/// Callback receiving errors from poll tasks.
pub type ErrorCallback = Arc<dyn Fn(WatchError) + Send + Sync>;

/// Fetches the current items of a tracked collection.
#[async_trait]
pub trait RemoteSource: Send + Sync {
	async fn fetch(&self, collection: &str) -> Result<Vec<RawItem>, FetchError>;
}

#[async_trait]
impl<T: RemoteSource + ?Sized> RemoteSource for Arc<T> {
	async fn fetch(&self, collection: &str) -> Result<Vec<RawItem>, FetchError> {
		(**self).fetch(collection).await
	}
}

/// Default poll interval for every collection type.
pub const DEFAULT_INTERVAL_MS: u64 = 3_000;
/// Default fetch timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Per-collection scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "validate", derive(validator::Validate))]
#[serde(rename_all = "camelCase", default)]
pub struct PollConfig {
	/// Time between cycle starts.
	#[cfg_attr(feature = "validate", validate(range(min = 100)))]
	pub interval_ms: u64,

	/// Disabled collections are not scheduled.
	pub enabled: bool,

	/// Upper bound for one fetch.
	#[cfg_attr(feature = "validate", validate(range(min = 100)))]
	pub timeout_ms: u64,

	/// Whether the first cycle runs right away instead of after one interval.
	pub immediate: bool,
}

impl Default for PollConfig {
	fn default() -> Self {
		Self {
			interval_ms: DEFAULT_INTERVAL_MS,
			enabled: true,
			timeout_ms: DEFAULT_TIMEOUT_MS,
			immediate: true,
		}
	}
}

impl PollConfig {
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn immediate(mut self, immediate: bool) -> Self {
		self.immediate = immediate;
		self
	}

	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}

	#[cfg(feature = "validate")]
	pub fn check(&self) -> Result<(), WatchError> {
		validator::Validate::validate(self).map_err(|e| WatchError::Config(e.to_string()))
	}

	#[cfg(not(feature = "validate"))]
	pub fn check(&self) -> Result<(), WatchError> {
		if self.interval_ms == 0 || self.timeout_ms == 0 {
			return Err(WatchError::Config(
				"interval and timeout must be positive".to_string(),
			));
		}
		Ok(())
	}
}

/// What one poll cycle did.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
	/// Fetched and reconciled.
	Completed(ReconcileReport),
	/// Another cycle for the same key was still running.
	Skipped,
	/// The fetch failed or timed out; the snapshot is untouched.
	Failed(FetchError),
}

impl CycleOutcome {
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Completed(_))
	}

	pub fn report(&self) -> Option<&ReconcileReport> {
		match self {
			Self::Completed(report) => Some(report),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn config_deserializes_camel_case_with_defaults() {
		let config: PollConfig =
			serde_json::from_str(r#"{"intervalMs": 5000, "enabled": false}"#).unwrap();
		assert_eq!(config.interval(), Duration::from_secs(5));
		assert!(!config.enabled);
		assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
		assert!(config.immediate);
	}

	#[test]
	fn zero_interval_is_rejected() {
		let config = PollConfig::default().with_interval(Duration::ZERO);
		assert!(matches!(config.check(), Err(WatchError::Config(_))));
		assert!(PollConfig::default().check().is_ok());
	}
}
