/* src/snapshot/store/read.rs */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

#[cfg(feature = "events")]
use super::super::StoreEvent;
use super::super::{ObservedState, SerializedSnapshot};
use super::{Partition, Store};

impl Store {
	/// Gets the last observed state of an item. This is a wait-free operation.
	pub fn get(&self, collection: &str, id: &str) -> Option<ObservedState> {
		let snapshot = self.inner.load();
		snapshot
			.get(collection)
			.and_then(|partition| partition.get(id).copied())
	}

	/// Returns true if the item has a recorded baseline.
	pub fn contains(&self, collection: &str, id: &str) -> bool {
		self.get(collection, id).is_some()
	}

	/// Returns an atomic snapshot of one collection.
	pub fn collection(&self, collection: &str) -> Option<Arc<Partition>> {
		let snapshot = self.inner.load();
		snapshot.get(collection).cloned()
	}

	/// Returns all collection keys in the store.
	pub fn collections(&self) -> Vec<String> {
		let snapshot = self.inner.load();
		snapshot.keys().cloned().collect()
	}

	/// Returns the number of tracked items across all collections.
	pub fn len(&self) -> usize {
		let snapshot = self.inner.load();
		snapshot.values().map(|partition| partition.len()).sum()
	}

	/// Returns true if no item is tracked.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Monotonic counter, incremented on every mutation.
	pub fn revision(&self) -> u64 {
		self.revision.load(Ordering::SeqCst)
	}

	/// Copies the whole snapshot into its persisted form.
	pub fn export(&self) -> SerializedSnapshot {
		let snapshot = self.inner.load();
		let collections = snapshot
			.iter()
			.map(|(key, partition)| {
				let items: BTreeMap<_, _> = partition
					.iter()
					.map(|(id, state)| (id.clone(), *state))
					.collect();
				(key.clone(), items)
			})
			.collect();
		SerializedSnapshot(collections)
	}

	/// Subscribes to store change events.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<StoreEvent> {
		self.events.subscribe()
	}
}
