/* src/snapshot/store/prune.rs */

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

#[cfg(feature = "events")]
use super::super::StoreEvent;
use super::super::{ItemId, ObservedState};
use super::Store;

impl Store {
	/// Drops every item of `collection` whose id is not in `present`.
	///
	/// Returns the pruned ids. Pruning has no other side effects; callers
	/// must not notify on it.
	pub fn remove_missing(&self, collection: &str, present: &HashSet<ItemId>) -> Vec<ItemId> {
		let stale: Vec<ItemId> = match self.collection(collection) {
			Some(partition) => partition
				.keys()
				.filter(|id| !present.contains(*id))
				.cloned()
				.collect(),
			None => return Vec::new(),
		};
		if stale.is_empty() {
			return stale;
		}

		let removed: RefCell<Vec<(ItemId, ObservedState)>> = RefCell::new(Vec::new());

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			let mut dropped = Vec::new();
			if let Some(partition) = new_map.get_mut(collection) {
				let partition = Arc::make_mut(partition);
				for id in &stale {
					if let Some(state) = partition.remove(id) {
						dropped.push((id.clone(), state));
					}
				}
			}
			*removed.borrow_mut() = dropped;
			new_map
		});

		let removed = removed.into_inner();
		if !removed.is_empty() {
			self.bump_revision();
		}

		#[cfg(feature = "events")]
		for (id, state) in &removed {
			self.emit(StoreEvent::Pruned {
				collection: collection.to_string(),
				id: id.clone(),
				state: *state,
			});
		}

		removed.into_iter().map(|(id, _)| id).collect()
	}
}
