/* src/snapshot/store/mod.rs */

mod prune;
mod read;
mod replace;
mod write;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use arc_swap::ArcSwap;

use super::{ItemId, ObservedState};
#[cfg(feature = "events")]
use super::StoreEvent;

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Items of one collection, keyed by id.
pub type Partition = HashMap<ItemId, ObservedState>;

/// Snapshot store with lock-free reads and atomic per-write replacement.
///
/// Uses RCU (Read-Copy-Update): a write clones the outer map of `Arc`ed
/// partitions plus the one partition it touches, so writers on different
/// collections never block each other and readers never see a torn update.
///
/// The store does not serialize writers on the same collection; the poll
/// scheduler runs at most one cycle per collection at a time.
pub struct Store {
	pub(crate) inner: ArcSwap<HashMap<String, Arc<Partition>>>,
	pub(crate) revision: AtomicU64,
	#[cfg(feature = "events")]
	pub(crate) events: tokio::sync::broadcast::Sender<StoreEvent>,
}

impl Store {
	/// Creates a new empty store with default event channel capacity.
	pub fn new() -> Self {
		Self {
			inner: ArcSwap::from_pointee(HashMap::new()),
			revision: AtomicU64::new(0),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Creates a new empty store with custom event channel capacity.
	///
	/// Note: Events may be dropped if subscribers process slower than
	/// the write rate and the channel fills up.
	#[cfg(feature = "events")]
	pub fn with_event_capacity(capacity: usize) -> Self {
		Self {
			inner: ArcSwap::from_pointee(HashMap::new()),
			revision: AtomicU64::new(0),
			events: tokio::sync::broadcast::channel(capacity).0,
		}
	}

	pub(crate) fn bump_revision(&self) -> u64 {
		self.revision
			.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
			+ 1
	}

	#[cfg(feature = "events")]
	pub(crate) fn emit(&self, event: StoreEvent) {
		let _ = self.events.send(event);
	}
}

impl Default for Store {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Store {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Store")
			.field("collections", &self.inner.load().len())
			.field("revision", &self.revision())
			.finish_non_exhaustive()
	}
}
