/* src/snapshot/store/replace.rs */

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "events")]
use super::super::StoreEvent;
use super::super::SerializedSnapshot;
use super::{Partition, Store};

impl Store {
	/// Atomically replaces the whole snapshot with a persisted one.
	///
	/// Used once per session, before the first poll cycle, so already-seen
	/// items keep their baseline across restarts. Bumps the revision once.
	pub fn replace_all(&self, snapshot: SerializedSnapshot) {
		let replacement: HashMap<String, Arc<Partition>> = snapshot
			.0
			.into_iter()
			.map(|(key, items)| (key, Arc::new(items.into_iter().collect::<Partition>())))
			.collect();

		#[cfg(feature = "events")]
		let (collections, items) = (
			replacement.len(),
			replacement.values().map(|p| p.len()).sum::<usize>(),
		);

		self.inner.store(Arc::new(replacement));
		self.bump_revision();

		#[cfg(feature = "events")]
		self.emit(StoreEvent::Restored { collections, items });
	}
}
