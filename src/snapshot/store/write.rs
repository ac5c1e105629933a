/* src/snapshot/store/write.rs */

use std::cell::RefCell;
use std::sync::Arc;

#[cfg(feature = "events")]
use super::super::StoreEvent;
use super::super::{ItemId, ObservedState};
use super::{Partition, Store};

impl Store {
	/// Records the state of an item, returning the previously stored state.
	///
	/// Writing a state equal to the stored one is a no-op and does not bump
	/// the revision.
	pub fn set(
		&self,
		collection: &str,
		id: impl Into<ItemId>,
		state: ObservedState,
	) -> Option<ObservedState> {
		let id = id.into();

		// Pre-check to avoid an rcu round for unchanged items.
		if let Some(current) = self.get(collection, id.as_str()) {
			if current == state {
				return Some(current);
			}
		}

		// Capture the previous state inside rcu to ensure event consistency.
		let previous: RefCell<Option<ObservedState>> = RefCell::new(None);

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			let partition = new_map
				.entry(collection.to_string())
				.or_insert_with(|| Arc::new(Partition::new()));
			*previous.borrow_mut() = Arc::make_mut(partition).insert(id.clone(), state);
			new_map
		});

		self.bump_revision();
		let previous = previous.into_inner();

		#[cfg(feature = "events")]
		{
			let event = match previous {
				Some(old) => StoreEvent::Changed {
					collection: collection.to_string(),
					id,
					old,
					new: state,
				},
				None => StoreEvent::Baseline {
					collection: collection.to_string(),
					id,
					state,
				},
			};
			self.emit(event);
		}

		previous
	}

	/// Removes a single item.
	pub fn remove(&self, collection: &str, id: &str) -> Option<ObservedState> {
		if !self.contains(collection, id) {
			return None;
		}

		let removed: RefCell<Option<(ItemId, ObservedState)>> = RefCell::new(None);

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			*removed.borrow_mut() = new_map
				.get_mut(collection)
				.and_then(|partition| Arc::make_mut(partition).remove_entry(id));
			new_map
		});

		// Item was removed concurrently between pre-check and rcu.
		let (_id, state) = removed.into_inner()?;
		self.bump_revision();

		#[cfg(feature = "events")]
		self.emit(StoreEvent::Pruned {
			collection: collection.to_string(),
			id: _id,
			state,
		});

		Some(state)
	}

	/// Drops a whole collection, returning how many items it held.
	pub fn clear_collection(&self, collection: &str) -> usize {
		let removed: RefCell<Option<Arc<Partition>>> = RefCell::new(None);

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			*removed.borrow_mut() = new_map.remove(collection);
			new_map
		});

		match removed.into_inner() {
			Some(partition) => {
				self.bump_revision();
				#[cfg(feature = "events")]
				for (id, state) in partition.iter() {
					self.emit(StoreEvent::Pruned {
						collection: collection.to_string(),
						id: id.clone(),
						state: *state,
					});
				}
				partition.len()
			}
			None => 0,
		}
	}

	/// Registers a collection with no items yet.
	///
	/// An empty successful fetch is still an observation, so the collection
	/// key shows up in [`Store::collections`] and in persisted snapshots.
	pub(crate) fn touch_collection(&self, collection: &str) {
		if self.inner.load().contains_key(collection) {
			return;
		}
		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			new_map
				.entry(collection.to_string())
				.or_insert_with(|| Arc::new(Partition::new()));
			new_map
		});
		self.bump_revision();
	}
}
